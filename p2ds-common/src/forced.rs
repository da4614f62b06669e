//! Forced-segment override
//!
//! Some segments end in a cutscene-driven transition that leaves no usable
//! completion marker in the demo. Their groups are replaced by an authored
//! duration and always count as finished.

use crate::config::ForcedSegment;
use crate::segments::SegmentGroup;
use crate::timing::find_best_ticks_for_seconds;

/// Tick count used for a forced segment's authored duration
pub fn forced_ticks(forced: &ForcedSegment) -> i64 {
    find_best_ticks_for_seconds(forced.seconds)
}

/// Apply every forced segment to an attempt's groups
///
/// Existing groups keep their position and source ids; ticks, validity,
/// completion signal and the finished flags are overwritten. Forced
/// segments missing from the attempt are appended in table order, so they
/// are always present downstream.
pub fn apply_forced_overrides(
    mut groups: Vec<SegmentGroup>,
    forced: &[ForcedSegment],
) -> Vec<SegmentGroup> {
    for segment in forced {
        let ticks = forced_ticks(segment);

        match groups.iter_mut().find(|g| g.segment_id == segment.id) {
            Some(group) => {
                tracing::debug!(
                    segment = %segment.id,
                    old_ticks = group.ticks,
                    new_ticks = ticks,
                    forced_secs = segment.seconds,
                    "forcing segment duration"
                );
                group.ticks = ticks;
                mark_forced(group);
            }
            None => {
                tracing::debug!(
                    segment = %segment.id,
                    ticks,
                    forced_secs = segment.seconds,
                    "injecting forced segment"
                );
                let mut group = SegmentGroup {
                    segment_id: segment.id.clone(),
                    ticks,
                    source_ids: Vec::new(),
                    valid: false,
                    completion_signal: false,
                    finished_candidate: false,
                    finished: false,
                };
                mark_forced(&mut group);
                groups.push(group);
            }
        }
    }

    groups
}

fn mark_forced(group: &mut SegmentGroup) {
    group.valid = true;
    group.completion_signal = true;
    group.finished_candidate = true;
    group.finished = true;
}
