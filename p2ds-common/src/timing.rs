//! Tick-based timing for demo splits
//!
//! This module provides the conversions between demo ticks, canonical
//! seconds and the clock strings used in split documents.
//!
//! # Architecture
//!
//! P2DS uses three time representations:
//!
//! 1. **Ticks (Internal)**: i64 tick counts summed from demo files
//! 2. **Seconds (Canonical)**: f64 values rounded to 3 decimals
//! 3. **Clock strings (Display)**: `m:ss.mmm` / `h:mm:ss.mmm`, snapped to
//!    the frame pattern used by the timing leaderboards
//!
//! ## Frame Quantization
//!
//! Every 6 ticks count as exactly 0.1 second. The remainder within a
//! tenth maps through a fixed table instead of `ticks / 60`:
//!
//! | ticks mod 6 | seconds |
//! |-------------|---------|
//! | 0           | 0.000   |
//! | 1           | 0.016   |
//! | 2           | 0.033   |
//! | 3           | 0.050   |
//! | 4           | 0.067   |
//! | 5           | 0.083   |
//!
//! # Conversion Flow
//!
//! ```text
//! Demo ticks (i64)
//!     ↓
//! ticks_to_seconds() → canonical seconds (f64, 3 dp)
//!     ↓
//! format_clock_with_snap() → "m:ss.mmm" (ms in {000,017,033,050,067,083})
//!     ↓
//! parse_snapped_clock_to_ms() → ms_to_lss_time() → "H:MM:SS.fffffff"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use p2ds_common::timing::*;
//!
//! assert_eq!(ticks_to_seconds(6), 0.1);
//! assert_eq!(ticks_to_seconds(3112), 51.867);
//!
//! assert_eq!(format_clock_with_snap(51.867), "0:51.867");
//! assert_eq!(format_clock_with_snap(3725.5), "1:02:05.500");
//!
//! assert_eq!(parse_formatted_time_to_ms("1:02.500"), Some(62_500));
//! assert_eq!(find_best_ticks_for_seconds(51.867), 3112);
//! ```

// ============================================================================
// Constants
// ============================================================================

/// Ticks that make up exactly one tenth of a canonical second
pub const TICKS_PER_TENTH: i64 = 6;

/// Seconds contributed by the `ticks mod 6` remainder
pub const REMAINDER_SECONDS: [f64; 6] = [0.0, 0.016, 0.033, 0.050, 0.067, 0.083];

/// Sub-tenth millisecond values a snapped clock string may end in.
///
/// Order matters: on equal distance the earlier entry wins.
pub const SNAP_PATTERN_MS: [i64; 6] = [17, 33, 50, 67, 83, 0];

/// Nominal seconds per tick, used when a demo header has no usable rate
pub const NAIVE_SECONDS_PER_TICK: f64 = 0.016;

/// Half-width of the best-tick search window
const SEARCH_WINDOW_TICKS: i64 = 200;

/// Largest tick count the best-tick search considers
const MAX_SEARCH_TICKS: i64 = i64::MAX / 2;

// ============================================================================
// Ticks ↔ Seconds
// ============================================================================

/// Convert a tick count to canonical seconds
///
/// `floor(ticks / 6) × 0.1 + REMAINDER_SECONDS[ticks mod 6]`, rounded to
/// 3 decimal places. Non-positive tick counts yield 0.
///
/// # Examples
///
/// ```rust
/// use p2ds_common::timing::ticks_to_seconds;
///
/// assert_eq!(ticks_to_seconds(0), 0.0);
/// assert_eq!(ticks_to_seconds(1), 0.016);
/// assert_eq!(ticks_to_seconds(36), 0.6);
/// assert_eq!(ticks_to_seconds(-5), 0.0);
///
/// // Not the naive 60 Hz division (1 / 60 would round to 0.017)
/// assert_eq!(ticks_to_seconds(7), 0.116);
/// ```
pub fn ticks_to_seconds(ticks: i64) -> f64 {
    if ticks <= 0 {
        return 0.0;
    }

    let tenths = ticks / TICKS_PER_TENTH;
    let remainder = (ticks % TICKS_PER_TENTH) as usize;

    round_3dp(tenths as f64 * 0.1 + REMAINDER_SECONDS[remainder])
}

/// Search for the tick count whose canonical seconds are closest to `target_secs`
///
/// The search is seeded with `round(target × 60)`, the inverse of
/// [`ticks_to_seconds`] up to the remainder table, and scans a ±200 tick
/// window around it in ascending order. `ticks_to_seconds` is strictly
/// increasing, so the closest tick is always inside the window. The first
/// tick reaching the minimal distance wins; an exact match ends the search
/// immediately.
///
/// # Returns
///
/// 0 for non-finite or non-positive targets, otherwise a tick count ≥ 1.
///
/// # Examples
///
/// ```rust
/// use p2ds_common::timing::{find_best_ticks_for_seconds, ticks_to_seconds};
///
/// assert_eq!(find_best_ticks_for_seconds(77.767), 4666);
/// assert_eq!(ticks_to_seconds(4666), 77.767);
///
/// assert_eq!(find_best_ticks_for_seconds(0.0), 0);
/// assert_eq!(find_best_ticks_for_seconds(f64::NAN), 0);
/// assert_eq!(find_best_ticks_for_seconds(0.001), 1);
/// ```
pub fn find_best_ticks_for_seconds(target_secs: f64) -> i64 {
    if !target_secs.is_finite() || target_secs <= 0.0 {
        return 0;
    }

    // Float-to-int casts saturate, so huge targets land on the cap
    let seed = ((target_secs * 60.0).round() as i64).clamp(1, MAX_SEARCH_TICKS);
    let start = seed.saturating_sub(SEARCH_WINDOW_TICKS).max(1);
    let end = seed.saturating_add(SEARCH_WINDOW_TICKS);

    let mut search = TickSearch::new(target_secs, start);
    search.scan(start..=end);

    search.best_ticks.max(1)
}

/// Running minimum for `find_best_ticks_for_seconds`
struct TickSearch {
    target_secs: f64,
    best_ticks: i64,
    best_diff: f64,
}

impl TickSearch {
    fn new(target_secs: f64, initial_ticks: i64) -> Self {
        Self {
            target_secs,
            best_ticks: initial_ticks,
            best_diff: f64::INFINITY,
        }
    }

    /// Scan candidates in iteration order; stops early on an exact match
    fn scan<I: IntoIterator<Item = i64>>(&mut self, candidates: I) {
        if self.best_diff == 0.0 {
            return;
        }
        for ticks in candidates {
            let diff = (ticks_to_seconds(ticks) - self.target_secs).abs();
            if diff < self.best_diff {
                self.best_diff = diff;
                self.best_ticks = ticks;
                if diff == 0.0 {
                    return;
                }
            }
        }
    }
}

// ============================================================================
// Seconds → Clock Strings
// ============================================================================

/// Render seconds as a clock string with the sub-tenth digits snapped
///
/// The value is rounded to whole milliseconds, then `ms mod 100` is
/// replaced by the nearest entry of [`SNAP_PATTERN_MS`] (first entry wins
/// on ties; distance does not wrap around 100). A snapped value of 1000 ms
/// carries into the seconds field.
///
/// Hours are omitted when zero: `m:ss.mmm`, otherwise `h:mm:ss.mmm`.
/// Non-finite or negative input renders as zero.
///
/// # Examples
///
/// ```rust
/// use p2ds_common::timing::format_clock_with_snap;
///
/// assert_eq!(format_clock_with_snap(0.0), "0:00.000");
/// assert_eq!(format_clock_with_snap(310.55), "5:10.550");
/// assert_eq!(format_clock_with_snap(12.345), "0:12.350");
/// assert_eq!(format_clock_with_snap(12.325), "0:12.317");
/// assert_eq!(format_clock_with_snap(3600.0), "1:00:00.000");
/// ```
pub fn format_clock_with_snap(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };

    let total_ms = (seconds * 1000.0).round() as i64;
    let mut total_secs = total_ms / 1000;
    let ms = total_ms % 1000;

    let mut snapped_ms = (ms / 100) * 100 + snap_sub_tenth(ms % 100);
    if snapped_ms >= 1000 {
        snapped_ms = 0;
        total_secs += 1;
    }

    let secs = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, snapped_ms)
    } else {
        format!("{}:{:02}.{:03}", minutes, secs, snapped_ms)
    }
}

/// Nearest snap pattern value for a 0..100 millisecond remainder
fn snap_sub_tenth(sub_tenth_ms: i64) -> i64 {
    let mut closest = SNAP_PATTERN_MS[0];
    let mut min_diff = (sub_tenth_ms - closest).abs();
    for &pattern in &SNAP_PATTERN_MS {
        let diff = (sub_tenth_ms - pattern).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = pattern;
        }
    }
    closest
}

/// Render seconds with exactly three decimals (`51.867`, `0.000`)
pub fn format_seconds_3dp(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

// ============================================================================
// Clock Strings → Milliseconds
// ============================================================================

/// Parse `m:ss.fff` or `h:mm:ss.fff` into milliseconds
///
/// Numeric fields are read leniently (leading digits only, garbage reads
/// as 0). The fraction is right-padded or truncated to 3 digits.
///
/// # Returns
///
/// `None` when the string is empty, does not have 2 or 3 colon-separated
/// fields, or the total does not fit in an `i64`. Used on data-import paths
/// (authored override tables).
///
/// # Examples
///
/// ```rust
/// use p2ds_common::timing::parse_formatted_time_to_ms;
///
/// assert_eq!(parse_formatted_time_to_ms("5:10.55"), Some(310_550));
/// assert_eq!(parse_formatted_time_to_ms("1:00:00.0000001"), Some(3_600_000));
/// assert_eq!(parse_formatted_time_to_ms("51.867"), None);
/// assert_eq!(parse_formatted_time_to_ms(""), None);
/// ```
pub fn parse_formatted_time_to_ms(s: &str) -> Option<i64> {
    parse_clock_fields(s)
}

/// Parse a clock string this module produced back into milliseconds
///
/// Same grammar as [`parse_formatted_time_to_ms`], but malformed input
/// yields 0.
///
/// ```rust
/// use p2ds_common::timing::{format_clock_with_snap, parse_snapped_clock_to_ms};
///
/// let clock = format_clock_with_snap(362.417);
/// assert_eq!(parse_snapped_clock_to_ms(&clock), 362_417);
/// assert_eq!(parse_snapped_clock_to_ms("garbage"), 0);
/// ```
pub fn parse_snapped_clock_to_ms(s: &str) -> i64 {
    parse_clock_fields(s).unwrap_or(0)
}

/// Parse a clock string into seconds (`None` when malformed)
pub fn parse_clock_to_seconds(s: &str) -> Option<f64> {
    parse_formatted_time_to_ms(s).map(|ms| ms as f64 / 1000.0)
}

fn parse_clock_fields(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();
    let (hours, minutes, sec_field) = match parts.as_slice() {
        [minutes, sec_field] => (0, lenient_int(minutes), *sec_field),
        [hours, minutes, sec_field] => (lenient_int(hours), lenient_int(minutes), *sec_field),
        _ => return None,
    };

    let mut sec_parts = sec_field.split('.');
    let seconds = sec_parts.next().map(lenient_int).unwrap_or(0);
    let millis = lenient_int(&three_digit_fraction(sec_parts.next().unwrap_or("0")));

    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?
        .checked_add(seconds.checked_mul(1000)?)?
        .checked_add(millis)
}

/// Leading-integer read: optional whitespace and sign, then digits.
/// Anything unreadable counts as 0.
fn lenient_int(field: &str) -> i64 {
    let trimmed = field.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));

    if negative {
        -value
    } else {
        value
    }
}

fn three_digit_fraction(fraction: &str) -> String {
    let mut digits: String = fraction.chars().take(3).collect();
    while digits.chars().count() < 3 {
        digits.push('0');
    }
    digits
}

// ============================================================================
// LiveSplit Time Strings
// ============================================================================

/// Render milliseconds as a LiveSplit time `H:MM:SS.fffffff`
///
/// Hours are not padded; the fraction has 7 digits (100 ns units).
/// Non-positive input renders as an empty string.
///
/// ```rust
/// use p2ds_common::timing::ms_to_lss_time;
///
/// assert_eq!(ms_to_lss_time(310_550), "0:05:10.5500000");
/// assert_eq!(ms_to_lss_time(3_723_017), "1:02:03.0170000");
/// assert_eq!(ms_to_lss_time(0), "");
/// ```
pub fn ms_to_lss_time(total_ms: i64) -> String {
    if total_ms <= 0 {
        return String::new();
    }

    let total_secs = total_ms / 1000;
    let frac_ms = total_ms % 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    format!("{}:{:02}:{:02}.{:07}", hours, minutes, secs, frac_ms * 10_000)
}

/// Snap seconds to the clock pattern and render as a LiveSplit time
pub fn snap_to_lss_time(seconds: f64) -> String {
    ms_to_lss_time(parse_snapped_clock_to_ms(&format_clock_with_snap(seconds)))
}

fn round_3dp(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ============================================================================
// Tests Module
// ============================================================================

#[cfg(test)]
#[path = "timing_tests.rs"]
mod tests;
