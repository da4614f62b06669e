//! Per-segment times of one attempt
//!
//! One tab-separated line per canonical segment:
//! `id  ticks  seconds  cumulative`, where the cumulative clock starts at
//! the display offset and is snapped to the tick pattern.

use p2ds_common::timing::{
    find_best_ticks_for_seconds, format_clock_with_snap, format_seconds_3dp, ticks_to_seconds,
};
use p2ds_common::{AttemptResult, SplitConfig};

/// Build the map-times lines
///
/// Forced segments always contribute their authored seconds. Segments the
/// attempt never reached print `id\t0\t0.000\t-` and leave the cumulative
/// unchanged.
pub fn build_map_times(result: &AttemptResult, config: &SplitConfig) -> Vec<String> {
    let mut cumulative = config.display_offset_secs;

    config
        .canonical_ids()
        .map(|id| {
            if let Some(seconds) = config.forced_seconds(id) {
                cumulative += seconds;
                return format!(
                    "{}\t{}\t{}\t{}",
                    id,
                    find_best_ticks_for_seconds(seconds),
                    format_seconds_3dp(seconds),
                    format_clock_with_snap(cumulative)
                );
            }

            match result.group(id) {
                Some(group) => {
                    let seconds = ticks_to_seconds(group.ticks);
                    cumulative += seconds;
                    format!(
                        "{}\t{}\t{}\t{}",
                        id,
                        group.ticks,
                        format_seconds_3dp(seconds),
                        format_clock_with_snap(cumulative)
                    )
                }
                None => format!("{}\t0\t0.000\t-", id),
            }
        })
        .collect()
}
