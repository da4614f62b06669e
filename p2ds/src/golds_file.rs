//! Best-segment override table
//!
//! Reads a previously written gold summary (or a hand-edited table in the
//! same shape) into `segment id -> seconds`. The single-attempt LiveSplit
//! output uses it for `BestSegmentTime`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use p2ds_common::timing::parse_clock_to_seconds;
use p2ds_common::SplitConfig;
use regex::Regex;
use tracing::debug;

use crate::patterns::cached_regex;

/// File name tried first, next to the output base
pub const DEFAULT_GOLDS_FILE: &str = "splits_gold.txt";

/// Per-segment best times in seconds
pub type OverrideTable = HashMap<String, f64>;

/// Parse a golds table
///
/// Lines that cannot be parsed are skipped one by one.
pub fn parse_override_table(text: &str, config: &SplitConfig) -> OverrideTable {
    let mut table = OverrideTable::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || is_header(line) {
            continue;
        }

        let cols = split_columns(line);
        let Some(&segment_id) = cols.first() else {
            continue;
        };
        if !config.is_canonical(segment_id) {
            continue;
        }

        match line_seconds(line, &cols) {
            Some((seconds, source)) => {
                debug!("golds parsed {} from {} -> {:.3}s", segment_id, source, seconds);
                table.insert(segment_id.to_string(), seconds);
            }
            None => debug!("golds: could not parse time for {} in line: {}", segment_id, line),
        }
    }

    table
}

/// `Map` header row, matched case-insensitively as a whole word
fn is_header(line: &str) -> bool {
    static HEADER: OnceLock<Result<Regex, String>> = OnceLock::new();
    cached_regex(&HEADER, r"(?i)^map\b").is_some_and(|re| re.is_match(line))
}

/// Tab-separated when the line has a tab, else separated by 2+ spaces
fn split_columns(line: &str) -> Vec<&str> {
    static WIDE_GAP: OnceLock<Result<Regex, String>> = OnceLock::new();

    if line.contains('\t') {
        return line.split('\t').map(str::trim).collect();
    }
    match cached_regex(&WIDE_GAP, r"\s{2,}") {
        Some(re) => re.split(line).map(str::trim).collect(),
        None => vec![line.trim()],
    }
}

fn line_seconds(line: &str, cols: &[&str]) -> Option<(f64, &'static str)> {
    // Formatted time (column 5)
    if let Some(formatted) = cols.get(4).filter(|c| c.contains(':') || c.contains('.')) {
        if let Some(seconds) = parse_clock_to_seconds(formatted) {
            return Some((seconds, "formatted column"));
        }
    }

    // Plain seconds (column 3)
    if let Some(number) = cols.get(2).filter(|c| !c.is_empty()) {
        if let Ok(seconds) = number.parse::<f64>() {
            if seconds.is_finite() {
                return Some((seconds, "numeric column"));
            }
        }
    }

    let token = find_clock_token(line)?;
    parse_clock_to_seconds(token).map(|seconds| (seconds, "clock token"))
}

/// First `m:ss.f` token: 1-2 digits, colon, 2 digits, dot, 1-7 digits
fn find_clock_token(line: &str) -> Option<&str> {
    static CLOCK_TOKEN: OnceLock<Result<Regex, String>> = OnceLock::new();
    cached_regex(&CLOCK_TOKEN, r"[0-9]{1,2}:[0-9]{2}\.[0-9]{1,7}")?
        .find(line)
        .map(|m| m.as_str())
}

/// Candidate files, in priority order
pub fn override_candidates(out_base: &str) -> Vec<PathBuf> {
    let base = Path::new(out_base);
    let dir = base.parent().unwrap_or_else(|| Path::new(""));
    vec![
        dir.join(DEFAULT_GOLDS_FILE),
        PathBuf::from(format!("{}_splits_gold.txt", out_base)),
    ]
}

/// Load the first readable, non-empty candidate
pub fn load_override_table(candidates: &[PathBuf], config: &SplitConfig) -> Option<OverrideTable> {
    for path in candidates {
        match std::fs::read_to_string(path) {
            Ok(text) if !text.is_empty() => {
                debug!("using golds source: {}", path.display());
                return Some(parse_override_table(&text, config));
            }
            Ok(_) => debug!("golds source {} is empty", path.display()),
            Err(e) => debug!("golds source {} not usable: {}", path.display(), e),
        }
    }
    debug!("no golds file found among {} candidates", candidates.len());
    None
}
