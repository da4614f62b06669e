//! Sequential completion gate
//!
//! A segment only counts as reached when every segment before it in the
//! canonical order was itself genuinely finished. The gate walks the
//! canonical list once per attempt, carrying `all_prev_finished`:
//!
//! ```text
//!            group present              candidate ∧ valid ∧ all_prev
//! Absent ◄─── no ───┬─── yes ──► Candidate ──────────────────────────► Finished
//!                   │                        │
//!                   │                        └── otherwise ──────────► Blocked
//! forced ───────────┴─────────────────────────────────────────────────► Finished
//! ```
//!
//! An absent or blocked segment turns `all_prev_finished` false for the rest
//! of the walk. Forced segments finish unconditionally and leave the
//! accumulator unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SplitConfig;
use crate::segments::SegmentGroup;

/// Gate state of one canonical segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// No group produced in this attempt
    Absent,
    /// Group exists, not yet gated
    Candidate,
    /// Validly finished
    Finished,
    /// Group exists but failed its own checks or a predecessor's
    Blocked,
}

/// Outcome of the gate for one canonical segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    pub segment_id: String,
    /// State before gating (`Absent` or `Candidate`)
    pub entered: GateState,
    pub state: GateState,
    /// Value of the accumulator when this segment was evaluated
    pub predecessors_finished: bool,
}

/// Whether a non-forced group is long enough and signalled to count
pub fn is_finished_candidate(group: &SegmentGroup, min_duration_secs: f64) -> bool {
    group.completion_signal && group.seconds() >= min_duration_secs
}

/// Compute `finished_candidate` and `finished` for every group
///
/// Groups for segments outside the canonical list are never finished.
/// Returns the updated groups (order preserved) and one decision per
/// canonical segment.
pub fn run_completion_gate(
    mut groups: Vec<SegmentGroup>,
    config: &SplitConfig,
) -> (Vec<SegmentGroup>, Vec<GateDecision>) {
    for group in groups.iter_mut() {
        if config.is_forced(&group.segment_id) {
            group.finished_candidate = true;
            group.finished = true;
        } else {
            group.finished_candidate = is_finished_candidate(group, config.min_duration_secs);
            group.finished = false;
        }
    }

    let positions: HashMap<String, usize> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| (g.segment_id.clone(), i))
        .collect();

    let mut decisions = Vec::with_capacity(config.segments.len());
    let mut all_prev_finished = true;

    for segment_id in config.canonical_ids() {
        let predecessors_finished = all_prev_finished;
        let entering = initial_state(&groups, segment_id);

        let state = match (config.is_forced(segment_id), positions.get(segment_id)) {
            (true, index) => {
                if let Some(&index) = index {
                    groups[index].finished = true;
                }
                GateState::Finished
            }
            (false, None) => GateState::Absent,
            (false, Some(&index)) => {
                let group = &mut groups[index];
                group.finished = group.finished_candidate && group.valid && all_prev_finished;

                if group.finished {
                    GateState::Finished
                } else {
                    GateState::Blocked
                }
            }
        };

        if let Some(&index) = positions.get(segment_id) {
            let group = &groups[index];
            tracing::debug!(
                segment = segment_id,
                from = ?entering,
                to = ?state,
                ticks = group.ticks,
                seconds = group.seconds(),
                completion_signal = group.completion_signal,
                candidate = group.finished_candidate,
                valid = group.valid,
                all_prev_finished,
                "gate decision"
            );
        } else {
            tracing::debug!(segment = segment_id, from = ?entering, to = ?state, "gate decision");
        }

        all_prev_finished &= state == GateState::Finished;

        decisions.push(GateDecision {
            segment_id: segment_id.to_string(),
            entered: entering,
            state,
            predecessors_finished,
        });
    }

    (groups, decisions)
}

/// State of a segment before gating
pub fn initial_state(groups: &[SegmentGroup], segment_id: &str) -> GateState {
    if groups.iter().any(|g| g.segment_id == segment_id) {
        GateState::Candidate
    } else {
        GateState::Absent
    }
}
