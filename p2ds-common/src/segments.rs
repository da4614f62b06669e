//! Per-file demo records and per-segment groups
//!
//! One logical pass over a segment may be split across several demo files
//! (reconnects, saves/loads). Consecutive valid records for the same segment
//! fold into one [`SegmentGroup`]; an invalid record severs continuity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::timing::ticks_to_seconds;

/// Segment id used for records whose file could not be read or parsed
pub const UNKNOWN_SEGMENT: &str = "unknown";

/// One demo file as reported by the demo-parsing collaborator
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoRecord {
    /// Source identifier (file name)
    pub source_id: String,
    /// Segment (map) the demo was recorded on
    pub segment_id: String,
    /// Playback ticks (≥ 0)
    pub ticks: i64,
    /// Playback time in seconds (≥ 0), informational only
    pub playback_secs: f64,
    /// File was readable, within the size limit and parsed
    pub valid: bool,
    /// A completion marker was found in the demo
    pub completion_signal: bool,
}

impl DemoRecord {
    /// Create a valid record; negative or non-finite timing clamps to 0
    pub fn new(
        source_id: impl Into<String>,
        segment_id: impl Into<String>,
        ticks: i64,
        playback_secs: f64,
        completion_signal: bool,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            segment_id: segment_id.into(),
            ticks: ticks.max(0),
            playback_secs: if playback_secs.is_finite() && playback_secs > 0.0 {
                playback_secs
            } else {
                0.0
            },
            valid: true,
            completion_signal,
        }
    }

    /// Record for an oversized, unreadable or unparseable file
    pub fn invalid(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            segment_id: UNKNOWN_SEGMENT.to_string(),
            ticks: 0,
            playback_secs: 0.0,
            valid: false,
            completion_signal: false,
        }
    }
}

/// Consecutive demo records for one segment, summed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentGroup {
    pub segment_id: String,
    /// Sum of the constituent records' ticks
    pub ticks: i64,
    /// Constituent source identifiers, in file order
    pub source_ids: Vec<String>,
    /// False when the group was severed by an invalid record
    pub valid: bool,
    /// OR of the constituent completion signals
    pub completion_signal: bool,
    /// Completion signal present and long enough to be a genuine pass
    pub finished_candidate: bool,
    /// Candidate, valid, and every canonical predecessor finished
    pub finished: bool,
}

impl SegmentGroup {
    fn open(record: &DemoRecord) -> Self {
        Self {
            segment_id: record.segment_id.clone(),
            ticks: record.ticks,
            source_ids: vec![record.source_id.clone()],
            valid: true,
            completion_signal: record.completion_signal,
            finished_candidate: false,
            finished: false,
        }
    }

    fn extend(&mut self, record: &DemoRecord) {
        self.ticks += record.ticks;
        self.source_ids.push(record.source_id.clone());
        self.completion_signal |= record.completion_signal;
    }

    /// Canonical seconds of the summed ticks
    pub fn seconds(&self) -> f64 {
        ticks_to_seconds(self.ticks)
    }
}

/// Fold an attempt's records (chronological file order) into segment groups
///
/// - a valid record extends the open group when the segment matches,
///   otherwise it closes the open group and starts a new one
/// - an invalid record closes the open group as `valid = false` and opens
///   nothing; its ticks and source id are not added anywhere
pub fn aggregate_records(records: &[DemoRecord]) -> Vec<SegmentGroup> {
    let mut groups = Vec::new();
    let mut current: Option<SegmentGroup> = None;

    for record in records {
        if !record.valid {
            if let Some(mut severed) = current.take() {
                severed.valid = false;
                groups.push(severed);
            }
            continue;
        }

        match current.as_mut() {
            Some(open) if open.segment_id == record.segment_id => open.extend(record),
            _ => {
                if let Some(closed) = current.take() {
                    groups.push(closed);
                }
                current = Some(SegmentGroup::open(record));
            }
        }
    }

    if let Some(last) = current {
        groups.push(last);
    }

    groups
}

/// Collapse repeated groups for the same segment
///
/// The entry keeps the position of the first occurrence and the values of
/// the last one.
pub fn collapse_duplicates(groups: Vec<SegmentGroup>) -> Vec<SegmentGroup> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut collapsed: Vec<SegmentGroup> = Vec::with_capacity(groups.len());

    for group in groups {
        match positions.get(&group.segment_id) {
            Some(&index) => {
                tracing::debug!(
                    segment = %group.segment_id,
                    ticks = group.ticks,
                    "later group supersedes earlier group for the same segment"
                );
                collapsed[index] = group;
            }
            None => {
                positions.insert(group.segment_id.clone(), collapsed.len());
                collapsed.push(group);
            }
        }
    }

    collapsed
}
