//! Per-attempt pipeline
//!
//! records → aggregate → collapse → forced override → completion gate
//!
//! Every stage takes its input by value and returns a new value; nothing is
//! mutated after the gate runs.

use serde::{Deserialize, Serialize};

use crate::config::SplitConfig;
use crate::forced::apply_forced_overrides;
use crate::gate::{run_completion_gate, GateDecision, GateState};
use crate::segments::{aggregate_records, collapse_duplicates, DemoRecord, SegmentGroup};

/// Finalized groups of one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// Attempt identifier (run folder name)
    pub attempt_id: String,
    /// Groups in file order, forced segments appended when absent
    pub groups: Vec<SegmentGroup>,
    /// Gate outcome per canonical segment
    pub gate: Vec<GateDecision>,
}

impl AttemptResult {
    /// Group for a segment, if the attempt has one
    pub fn group(&self, segment_id: &str) -> Option<&SegmentGroup> {
        self.groups.iter().find(|g| g.segment_id == segment_id)
    }

    /// Gate state for a canonical segment
    pub fn state(&self, segment_id: &str) -> Option<GateState> {
        self.gate
            .iter()
            .find(|d| d.segment_id == segment_id)
            .map(|d| d.state)
    }

    /// Number of canonical segments that finished
    pub fn finished_count(&self) -> usize {
        self.gate
            .iter()
            .filter(|d| d.state == GateState::Finished)
            .count()
    }
}

/// Run one attempt's records through the pipeline
///
/// Returns `None` when the attempt has no valid record at all. Records for
/// forced segments are dropped before grouping: their duration always comes
/// from the override table and they do not sever continuity.
pub fn process_attempt(
    attempt_id: &str,
    records: &[DemoRecord],
    config: &SplitConfig,
) -> Option<AttemptResult> {
    if !records.iter().any(|r| r.valid) {
        tracing::warn!(attempt = attempt_id, "No usable demo records in attempt");
        return None;
    }

    let kept: Vec<DemoRecord> = records
        .iter()
        .filter(|r| {
            let forced = r.valid && config.is_forced(&r.segment_id);
            if forced {
                tracing::debug!(
                    attempt = attempt_id,
                    source = %r.source_id,
                    segment = %r.segment_id,
                    "skipping demo of forced segment"
                );
            }
            !forced
        })
        .cloned()
        .collect();

    let groups = collapse_duplicates(aggregate_records(&kept));
    let groups = apply_forced_overrides(groups, &config.forced);
    let (groups, gate) = run_completion_gate(groups, config);

    let result = AttemptResult {
        attempt_id: attempt_id.to_string(),
        groups,
        gate,
    };

    tracing::debug!(
        attempt = attempt_id,
        groups = result.groups.len(),
        finished = result.finished_count(),
        "attempt processed"
    );

    Some(result)
}
