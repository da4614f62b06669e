//! Unit tests for tick/clock conversions
//!
//! Covers the frame-quantized tick → seconds mapping, clock snapping,
//! lenient clock parsing and the best-tick search.

use super::*;

// ============================================================================
// Test Group 1: Ticks → Seconds
// ============================================================================

#[test]
fn test_ticks_to_seconds_reference_values() {
    assert_eq!(ticks_to_seconds(0), 0.0);
    assert_eq!(ticks_to_seconds(1), 0.016);
    assert_eq!(ticks_to_seconds(2), 0.033);
    assert_eq!(ticks_to_seconds(3), 0.05);
    assert_eq!(ticks_to_seconds(4), 0.067);
    assert_eq!(ticks_to_seconds(5), 0.083);
    assert_eq!(ticks_to_seconds(6), 0.1);
    assert_eq!(ticks_to_seconds(36), 0.6);
    assert_eq!(ticks_to_seconds(60), 1.0);
    assert_eq!(ticks_to_seconds(1020), 17.0);
}

#[test]
fn test_ticks_to_seconds_non_positive_is_zero() {
    assert_eq!(ticks_to_seconds(-1), 0.0);
    assert_eq!(ticks_to_seconds(i64::MIN), 0.0);
}

#[test]
fn test_ticks_to_seconds_monotonic() {
    let mut previous = ticks_to_seconds(0);
    for ticks in 1..=20_000 {
        let current = ticks_to_seconds(ticks);
        assert!(
            current > previous,
            "ticks_to_seconds must increase: {} -> {} at tick {}",
            previous,
            current,
            ticks
        );
        previous = current;
    }
}

#[test]
fn test_ticks_to_seconds_steps_are_frame_sized() {
    // Every tick advances 16 or 17 ms, never the naive 16.667
    for ticks in 0..6_000 {
        let step_ms = ((ticks_to_seconds(ticks + 1) - ticks_to_seconds(ticks)) * 1000.0).round();
        assert!(
            step_ms == 16.0 || step_ms == 17.0,
            "unexpected step of {} ms after tick {}",
            step_ms,
            ticks
        );
    }
}

// ============================================================================
// Test Group 2: Clock Snapping
// ============================================================================

#[test]
fn test_snapped_ms_component_always_in_pattern() {
    const ALLOWED: [&str; 6] = ["000", "017", "033", "050", "067", "083"];

    for ms in 0..100_000 {
        let clock = format_clock_with_snap(ms as f64 / 1000.0);
        let fraction = &clock[clock.len() - 3..];
        assert!(ALLOWED.contains(&fraction), "clock {} has an unsnapped fraction", clock);
    }
}

#[test]
fn test_snap_first_minimal_match_wins() {
    assert_eq!(snap_sub_tenth(25), 17); // 17 and 33 both 8 away
    assert_eq!(snap_sub_tenth(41), 33);
    assert_eq!(snap_sub_tenth(75), 67); // 67 and 83 both 8 away
    assert_eq!(snap_sub_tenth(8), 0);
    assert_eq!(snap_sub_tenth(9), 17);
    // Distance does not wrap around the tenth
    assert_eq!(snap_sub_tenth(95), 83);
    assert_eq!(snap_sub_tenth(99), 83);
}

#[test]
fn test_format_clock_minutes_and_hours() {
    assert_eq!(format_clock_with_snap(0.6), "0:00.600");
    assert_eq!(format_clock_with_snap(59.99), "0:59.983");
    assert_eq!(format_clock_with_snap(61.0), "1:01.000");
    assert_eq!(format_clock_with_snap(599.0), "9:59.000");
    assert_eq!(format_clock_with_snap(3599.999), "59:59.983");
    assert_eq!(format_clock_with_snap(3661.067), "1:01:01.067");
    assert_eq!(format_clock_with_snap(36_000.0), "10:00:00.000");
}

#[test]
fn test_format_clock_invalid_input_renders_zero() {
    assert_eq!(format_clock_with_snap(-4.0), "0:00.000");
    assert_eq!(format_clock_with_snap(f64::NAN), "0:00.000");
    assert_eq!(format_clock_with_snap(f64::INFINITY), "0:00.000");
}

#[test]
fn test_format_seconds_3dp() {
    assert_eq!(format_seconds_3dp(0.0), "0.000");
    assert_eq!(format_seconds_3dp(51.867), "51.867");
    assert_eq!(format_seconds_3dp(310.55), "310.550");
}

// ============================================================================
// Test Group 3: Clock Parsing
// ============================================================================

#[test]
fn test_parse_formatted_time_two_and_three_fields() {
    assert_eq!(parse_formatted_time_to_ms("0:51.867"), Some(51_867));
    assert_eq!(parse_formatted_time_to_ms("5:10.550"), Some(310_550));
    assert_eq!(parse_formatted_time_to_ms("1:01:01.067"), Some(3_661_067));
    assert_eq!(parse_formatted_time_to_ms("12:00"), Some(720_000));
}

#[test]
fn test_parse_fraction_padding_and_truncation() {
    assert_eq!(parse_formatted_time_to_ms("0:01.5"), Some(1_500));
    assert_eq!(parse_formatted_time_to_ms("0:01.05"), Some(1_050));
    assert_eq!(parse_formatted_time_to_ms("0:01.0509999"), Some(1_050));
    assert_eq!(parse_formatted_time_to_ms("0:01."), Some(1_000));
}

#[test]
fn test_parse_lenient_fields() {
    // Unreadable fields count as zero once the shape is right
    assert_eq!(parse_formatted_time_to_ms("a:b"), Some(0));
    assert_eq!(parse_formatted_time_to_ms(" 2:05x.1"), Some(125_100));
    assert_eq!(parse_formatted_time_to_ms("1:05.12abc"), Some(65_012));
}

#[test]
fn test_parse_malformed_sentinels() {
    assert_eq!(parse_formatted_time_to_ms(""), None);
    assert_eq!(parse_formatted_time_to_ms("51.867"), None);
    assert_eq!(parse_formatted_time_to_ms("1:2:3:4"), None);
    assert_eq!(parse_clock_to_seconds("nope"), None);

    assert_eq!(parse_snapped_clock_to_ms(""), 0);
    assert_eq!(parse_snapped_clock_to_ms("1:2:3:4"), 0);
}

#[test]
fn test_parse_overflowing_fields_fail() {
    assert_eq!(parse_formatted_time_to_ms("99999999999999999:00.000"), None);
    assert_eq!(parse_formatted_time_to_ms("9999999999999:00:00.000"), None);
    assert_eq!(parse_formatted_time_to_ms("0:99999999999999999999.5"), None);
    assert_eq!(parse_formatted_time_to_ms("-99999999999999999:00.000"), None);
    assert_eq!(parse_clock_to_seconds("99999999999999999:00.000"), None);
    assert_eq!(parse_snapped_clock_to_ms("99999999999999999:00.000"), 0);
}

#[test]
fn test_parse_clock_to_seconds() {
    assert_eq!(parse_clock_to_seconds("0:51.867"), Some(51.867));
    assert_eq!(parse_clock_to_seconds("1:00:00.000"), Some(3600.0));
}

#[test]
fn test_snapped_clock_reparses_to_same_ms() {
    for ms in (0..7_200_000).step_by(7_919) {
        let clock = format_clock_with_snap(ms as f64 / 1000.0);
        let reparsed = parse_snapped_clock_to_ms(&clock);
        assert_eq!(format_clock_with_snap(reparsed as f64 / 1000.0), clock);
    }
}

// ============================================================================
// Test Group 4: Best-Tick Search
// ============================================================================

#[test]
fn test_find_best_ticks_domain_errors() {
    assert_eq!(find_best_ticks_for_seconds(0.0), 0);
    assert_eq!(find_best_ticks_for_seconds(-3.0), 0);
    assert_eq!(find_best_ticks_for_seconds(f64::NAN), 0);
    assert_eq!(find_best_ticks_for_seconds(f64::INFINITY), 0);
}

#[test]
fn test_find_best_ticks_forced_durations() {
    assert_eq!(find_best_ticks_for_seconds(51.867), 3112);
    assert_eq!(find_best_ticks_for_seconds(77.767), 4666);
}

#[test]
fn test_find_best_ticks_is_at_least_one() {
    assert_eq!(find_best_ticks_for_seconds(1e-9), 1);
    assert_eq!(find_best_ticks_for_seconds(0.008), 1);
}

#[test]
fn test_find_best_ticks_within_tolerance() {
    let targets = [
        0.1, 0.25, 1.0, 17.0, 51.867, 79.9, 80.0, 80.5, 100.0, 123.456, 999.999, 2_500.0,
        4_321.123, 9_999.99, 10_000.0,
    ];

    for target in targets {
        let ticks = find_best_ticks_for_seconds(target);
        let diff = (ticks_to_seconds(ticks) - target).abs();
        assert!(
            diff <= 0.2,
            "target {} resolved to {} ticks ({}s), diff {}",
            target,
            ticks,
            ticks_to_seconds(ticks),
            diff
        );
    }
}

#[test]
fn test_find_best_ticks_round_trip_small() {
    for ticks in 1..=600 {
        let seconds = ticks_to_seconds(ticks);
        let found = find_best_ticks_for_seconds(seconds);
        assert_eq!(
            ticks_to_seconds(found),
            seconds,
            "round trip for {} ticks found {}",
            ticks,
            found
        );
    }
}

#[test]
fn test_find_best_ticks_round_trip_long_durations() {
    // Beyond ~80 s a 0.016 s/tick estimate would miss a ±200 tick window
    for ticks in [4_799, 4_801, 5_000, 6_000, 60_000, 123_457, 360_000] {
        let seconds = ticks_to_seconds(ticks);
        assert_eq!(find_best_ticks_for_seconds(seconds), ticks);
    }
}

#[test]
fn test_find_best_ticks_huge_targets() {
    // Saturating seed: no overflow, still a positive tick count
    for target in [1e300, f64::MAX, 1e18] {
        let ticks = find_best_ticks_for_seconds(target);
        assert!(ticks >= 1, "target {} resolved to {}", target, ticks);
    }

    // A day-long target resolves exactly and without a long scan
    assert_eq!(find_best_ticks_for_seconds(86_400.0), 5_184_000);
    assert_eq!(find_best_ticks_for_seconds(1e9), 60_000_000_000);
}

// ============================================================================
// Test Group 5: LiveSplit Time Strings
// ============================================================================

#[test]
fn test_ms_to_lss_time() {
    assert_eq!(ms_to_lss_time(1), "0:00:00.0010000");
    assert_eq!(ms_to_lss_time(51_867), "0:00:51.8670000");
    assert_eq!(ms_to_lss_time(36_000_000), "10:00:00.0000000");
    assert_eq!(ms_to_lss_time(-5), "");
}

#[test]
fn test_snap_to_lss_time() {
    assert_eq!(snap_to_lss_time(362.4), "0:06:02.4000000");
    assert_eq!(snap_to_lss_time(362.425), "0:06:02.4170000");
    assert_eq!(snap_to_lss_time(0.0), "");
}
