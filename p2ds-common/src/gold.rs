//! Cross-attempt best times ("golds")
//!
//! [`GoldAggregator`] folds finalized attempts one at a time and keeps the
//! smallest eligible tick count per segment. Ticks for a segment only ever
//! decrease; on a tie the earlier holder stays.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::attempt::AttemptResult;
use crate::config::SplitConfig;
use crate::forced::forced_ticks;
use crate::segments::SegmentGroup;

/// Where a best time came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldOrigin {
    /// An attempt (run folder name)
    Attempt(String),
    /// Authored duration of a forced segment
    Forced,
}

impl fmt::Display for GoldOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoldOrigin::Attempt(id) => write!(f, "{}", id),
            GoldOrigin::Forced => write!(f, "FORCED"),
        }
    }
}

impl Serialize for GoldOrigin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Best known duration of one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoldRecord {
    pub best_ticks: i64,
    pub origin: GoldOrigin,
}

/// Folds attempts into per-segment best times
pub struct GoldAggregator<'a> {
    config: &'a SplitConfig,
    best: HashMap<String, GoldRecord>,
    attempts_folded: usize,
}

impl<'a> GoldAggregator<'a> {
    /// Start with no best times
    pub fn new(config: &'a SplitConfig) -> Self {
        Self {
            config,
            best: HashMap::new(),
            attempts_folded: 0,
        }
    }

    /// Whether a non-forced group may compete for its segment's best time
    pub fn is_eligible(&self, group: &SegmentGroup) -> bool {
        group.finished && group.valid && group.seconds() >= self.config.min_duration_secs
    }

    /// Fold one finalized attempt; returns how many bests it improved
    pub fn fold_attempt(&mut self, attempt: &AttemptResult) -> usize {
        let mut improved = 0;

        for group in &attempt.groups {
            if let Some(forced) = self.config.forced.iter().find(|f| f.id == group.segment_id) {
                if self.offer(&group.segment_id, forced_ticks(forced), GoldOrigin::Forced) {
                    improved += 1;
                }
                continue;
            }

            if !group.valid {
                tracing::debug!(segment = %group.segment_id, attempt = %attempt.attempt_id, "skipping invalid group");
                continue;
            }
            if !group.finished {
                tracing::debug!(segment = %group.segment_id, attempt = %attempt.attempt_id, "skipping unfinished group");
                continue;
            }
            if !self.is_eligible(group) {
                tracing::debug!(
                    segment = %group.segment_id,
                    attempt = %attempt.attempt_id,
                    seconds = group.seconds(),
                    min = self.config.min_duration_secs,
                    "skipping group below minimum duration"
                );
                continue;
            }

            if self.offer(
                &group.segment_id,
                group.ticks,
                GoldOrigin::Attempt(attempt.attempt_id.clone()),
            ) {
                improved += 1;
            }
        }

        self.attempts_folded += 1;
        improved
    }

    /// Replace the current best iff `ticks` is strictly smaller
    fn offer(&mut self, segment_id: &str, ticks: i64, origin: GoldOrigin) -> bool {
        match self.best.get(segment_id) {
            Some(current) if ticks >= current.best_ticks => false,
            _ => {
                tracing::debug!(segment = segment_id, ticks, origin = %origin, "new gold candidate");
                self.best.insert(
                    segment_id.to_string(),
                    GoldRecord {
                        best_ticks: ticks,
                        origin,
                    },
                );
                true
            }
        }
    }

    /// Current best for a segment
    pub fn best(&self, segment_id: &str) -> Option<&GoldRecord> {
        self.best.get(segment_id)
    }

    pub fn attempts_folded(&self) -> usize {
        self.attempts_folded
    }

    /// Close the fold; forced segments still absent get their authored time
    pub fn finish(mut self) -> GoldBook {
        for forced in &self.config.forced {
            if !self.best.contains_key(&forced.id) {
                let ticks = forced_ticks(forced);
                tracing::debug!(segment = %forced.id, ticks, "ensured forced gold");
                self.best.insert(
                    forced.id.clone(),
                    GoldRecord {
                        best_ticks: ticks,
                        origin: GoldOrigin::Forced,
                    },
                );
            }
        }

        GoldBook { records: self.best }
    }
}

/// Final best times, keyed by segment id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoldBook {
    records: HashMap<String, GoldRecord>,
}

impl GoldBook {
    pub fn get(&self, segment_id: &str) -> Option<&GoldRecord> {
        self.records.get(segment_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of canonical segments, in canonical order
    pub fn in_canonical_order<'a>(
        &'a self,
        config: &'a SplitConfig,
    ) -> impl Iterator<Item = (&'a str, Option<&'a GoldRecord>)> + 'a {
        config
            .canonical_ids()
            .map(move |id| (id, self.records.get(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::process_attempt;
    use crate::segments::DemoRecord;

    fn finished_group(id: &str, ticks: i64) -> SegmentGroup {
        SegmentGroup {
            segment_id: id.to_string(),
            ticks,
            source_ids: Vec::new(),
            valid: true,
            completion_signal: true,
            finished_candidate: true,
            finished: true,
        }
    }

    fn attempt(id: &str, groups: Vec<SegmentGroup>) -> AttemptResult {
        AttemptResult {
            attempt_id: id.to_string(),
            groups,
            gate: Vec::new(),
        }
    }

    #[test]
    fn test_smaller_ticks_win() {
        let config = SplitConfig::default();
        let mut golds = GoldAggregator::new(&config);

        golds.fold_attempt(&attempt("run1", vec![finished_group("sp_a1_intro1", 1100)]));
        golds.fold_attempt(&attempt("run2", vec![finished_group("sp_a1_intro1", 1050)]));

        let best = golds.best("sp_a1_intro1").unwrap();
        assert_eq!(best.best_ticks, 1050);
        assert_eq!(best.origin, GoldOrigin::Attempt("run2".to_string()));
    }

    #[test]
    fn test_ties_keep_earlier_winner() {
        let config = SplitConfig::default();
        let mut golds = GoldAggregator::new(&config);

        golds.fold_attempt(&attempt("run1", vec![finished_group("sp_a1_intro1", 1100)]));
        let improved = golds.fold_attempt(&attempt("run2", vec![finished_group("sp_a1_intro1", 1100)]));

        assert_eq!(improved, 0);
        assert_eq!(
            golds.best("sp_a1_intro1").unwrap().origin,
            GoldOrigin::Attempt("run1".to_string())
        );
    }

    #[test]
    fn test_ineligible_groups_are_ignored() {
        let config = SplitConfig::default();
        let mut golds = GoldAggregator::new(&config);

        let mut unfinished = finished_group("sp_a1_intro1", 1100);
        unfinished.finished = false;
        let mut invalid = finished_group("sp_a1_intro2", 1100);
        invalid.valid = false;
        // 900 ticks = 15 s, under the 17 s minimum
        let short = finished_group("sp_a1_intro3", 900);

        let improved = golds.fold_attempt(&attempt("run", vec![unfinished, invalid, short]));
        assert_eq!(improved, 0);
        assert!(golds.best("sp_a1_intro1").is_none());
        assert!(golds.best("sp_a1_intro2").is_none());
        assert!(golds.best("sp_a1_intro3").is_none());
    }

    #[test]
    fn test_forced_segments_use_authored_duration() {
        let config = SplitConfig::default();
        let mut golds = GoldAggregator::new(&config);

        // Observed ticks are ignored in favour of the authored duration
        golds.fold_attempt(&attempt("run", vec![finished_group("sp_a2_bts6", 10)]));

        let best = golds.best("sp_a2_bts6").unwrap();
        assert_eq!(best.best_ticks, 3112);
        assert_eq!(best.origin, GoldOrigin::Forced);
        assert_eq!(best.origin.to_string(), "FORCED");
    }

    #[test]
    fn test_finish_seeds_forced_segments() {
        let config = SplitConfig::default();
        let book = GoldAggregator::new(&config).finish();

        assert_eq!(book.len(), 2);
        assert_eq!(book.get("sp_a3_00").unwrap().best_ticks, 4666);
        assert!(book.get("sp_a1_intro1").is_none());
    }

    #[test]
    fn test_pipeline_attempts_fold_to_minimum() {
        // 1000 ticks = 16.667 s, 900 ticks = 15 s
        let config = SplitConfig {
            min_duration_secs: 10.0,
            ..SplitConfig::default()
        };
        let run = |id: &str, ticks: i64| {
            process_attempt(
                id,
                &[DemoRecord::new("fullgame_1.dem", "sp_a1_intro1", ticks, 0.0, true)],
                &config,
            )
            .unwrap()
        };

        let first = run("run1", 1000);
        let second = run("run2", 900);
        let third = run("run3", 1200);

        let mut golds = GoldAggregator::new(&config);
        for attempt in [&first, &second, &third] {
            golds.fold_attempt(attempt);
        }
        assert_eq!(golds.attempts_folded(), 3);

        let book = golds.finish();
        let best = book.get("sp_a1_intro1").unwrap();
        assert_eq!(best.best_ticks, 900);
        assert_eq!(best.origin, GoldOrigin::Attempt("run2".to_string()));

        let ordered: Vec<_> = book.in_canonical_order(&config).collect();
        assert_eq!(ordered.len(), 62);
        assert_eq!(ordered[0].0, "sp_a1_intro1");
        assert!(ordered[1].1.is_none());
    }
}
