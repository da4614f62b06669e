//! Gold summary table
//!
//! Tab-separated, one row per canonical segment. The first segment's
//! displayed seconds include the display offset; ticks are always raw.

use p2ds_common::timing::{format_clock_with_snap, format_seconds_3dp, ticks_to_seconds};
use p2ds_common::{GoldBook, SplitConfig};

pub const GOLD_TABLE_HEADER: &str = "Map\tBest_Ticks\tBest_Seconds\tRun_Folder\tFormatted_Time";

pub fn build_gold_table(book: &GoldBook, config: &SplitConfig) -> Vec<String> {
    let first = config.first_segment();
    let mut lines = vec![GOLD_TABLE_HEADER.to_string()];

    for (id, record) in book.in_canonical_order(config) {
        let line = match record {
            Some(record) => {
                let mut seconds = ticks_to_seconds(record.best_ticks);
                if Some(id) == first {
                    seconds += config.display_offset_secs;
                }
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    id,
                    record.best_ticks,
                    format_seconds_3dp(seconds),
                    record.origin,
                    format_clock_with_snap(seconds)
                )
            }
            None => format!("{}\t-\t-\t-\t-", id),
        };
        lines.push(line);
    }

    lines
}
