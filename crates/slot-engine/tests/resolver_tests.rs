//! Tests for the pure `offerable_dates` / `offerable_times` pair.

use chrono::{NaiveDate, NaiveTime, Weekday};
use slot_engine::rule::format_times;
use slot_engine::{offerable_dates, offerable_times, AvailabilityRule};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn weekly(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> AvailabilityRule {
    AvailabilityRule::recurring(weekday, start, end)
}

fn once(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> AvailabilityRule {
    AvailabilityRule::one_off(date, start, end)
}

/// 2026-03-16 is a Monday.
fn monday() -> NaiveDate {
    d(2026, 3, 16)
}

// ── offerable_dates ─────────────────────────────────────────────────────────

#[test]
fn monday_rule_over_two_weeks_from_a_monday() {
    let rules = vec![weekly(Weekday::Mon, t(10, 0), t(11, 0))];

    let dates = offerable_dates(&rules, monday(), 14);

    assert_eq!(dates, vec![d(2026, 3, 16), d(2026, 3, 23)]);
}

#[test]
fn monday_rule_from_a_sunday_still_finds_two_mondays() {
    let rules = vec![weekly(Weekday::Mon, t(10, 0), t(11, 0))];

    // Sunday 2026-03-15: days 0..13 cover Mar 15 .. Mar 28.
    let dates = offerable_dates(&rules, d(2026, 3, 15), 14);

    assert_eq!(dates, vec![d(2026, 3, 16), d(2026, 3, 23)]);
}

#[test]
fn horizon_is_exclusive_of_its_last_day() {
    let rules = vec![weekly(Weekday::Mon, t(10, 0), t(11, 0))];

    // Offsets 0..7 stop at Sunday; next Monday is day 7 and not included.
    assert_eq!(offerable_dates(&rules, monday(), 7), vec![monday()]);
    assert_eq!(
        offerable_dates(&rules, monday(), 8),
        vec![monday(), d(2026, 3, 23)]
    );
}

#[test]
fn zero_horizon_keeps_only_one_offs() {
    let rules = vec![
        weekly(Weekday::Mon, t(10, 0), t(11, 0)),
        once(d(2026, 4, 2), t(9, 0), t(10, 0)),
    ];

    assert_eq!(offerable_dates(&rules, monday(), 0), vec![d(2026, 4, 2)]);
}

#[test]
fn one_off_dates_are_included_even_in_the_past_or_beyond_horizon() {
    let rules = vec![
        once(d(2026, 1, 5), t(9, 0), t(10, 0)),
        once(d(2026, 12, 24), t(9, 0), t(10, 0)),
    ];

    let dates = offerable_dates(&rules, monday(), 14);

    assert_eq!(dates, vec![d(2026, 1, 5), d(2026, 12, 24)]);
}

#[test]
fn one_off_and_recurring_on_the_same_date_are_deduplicated() {
    let rules = vec![
        weekly(Weekday::Wed, t(9, 0), t(10, 0)),
        once(d(2026, 3, 18), t(14, 0), t(15, 0)),
        once(d(2026, 3, 18), t(16, 0), t(17, 0)),
    ];

    let dates = offerable_dates(&rules, monday(), 14);

    assert_eq!(dates, vec![d(2026, 3, 18), d(2026, 3, 25)]);
}

#[test]
fn dates_are_sorted_across_kinds() {
    let rules = vec![
        once(d(2026, 3, 20), t(9, 0), t(10, 0)),
        weekly(Weekday::Tue, t(9, 0), t(10, 0)),
        once(d(2026, 3, 14), t(9, 0), t(10, 0)),
    ];

    let dates = offerable_dates(&rules, monday(), 14);

    assert_eq!(
        dates,
        vec![d(2026, 3, 14), d(2026, 3, 17), d(2026, 3, 20), d(2026, 3, 24)]
    );
}

#[test]
fn sunday_and_saturday_rules_expand() {
    let rules = vec![
        weekly(Weekday::Sun, t(9, 0), t(10, 0)),
        weekly(Weekday::Sat, t(9, 0), t(10, 0)),
    ];

    let dates = offerable_dates(&rules, monday(), 7);

    assert_eq!(dates, vec![d(2026, 3, 21), d(2026, 3, 22)]);
}

#[test]
fn empty_rules_yield_no_dates() {
    assert!(offerable_dates(&[], monday(), 14).is_empty());
}

#[test]
fn inactive_rules_contribute_no_dates() {
    let rules = vec![
        weekly(Weekday::Mon, t(10, 0), t(11, 0)).with_active(false),
        once(d(2026, 3, 18), t(10, 0), t(11, 0)).with_active(false),
    ];

    assert!(offerable_dates(&rules, monday(), 14).is_empty());
}

#[test]
fn malformed_rules_contribute_no_dates() {
    let rules = vec![
        weekly(Weekday::Mon, t(10, 0), t(10, 0)),
        once(d(2026, 3, 18), t(11, 0), t(10, 0)),
    ];

    assert!(offerable_dates(&rules, monday(), 14).is_empty());
}

// ── offerable_times ─────────────────────────────────────────────────────────

#[test]
fn trailing_partial_step_is_not_offered() {
    let rules = vec![weekly(Weekday::Mon, t(9, 0), t(9, 45))];

    let times = offerable_times(&rules, monday(), 30);

    assert_eq!(format_times(&times), vec!["09:00", "09:30"]);
}

#[test]
fn end_time_is_never_offered() {
    let rules = vec![weekly(Weekday::Mon, t(9, 0), t(10, 0))];

    let times = offerable_times(&rules, monday(), 30);

    assert_eq!(format_times(&times), vec!["09:00", "09:30"]);
}

#[test]
fn window_narrower_than_one_step_yields_nothing() {
    let rules = vec![weekly(Weekday::Mon, t(9, 0), t(9, 20))];

    assert!(offerable_times(&rules, monday(), 30).is_empty());
    // The same window at a finer step does produce times.
    assert_eq!(
        format_times(&offerable_times(&rules, monday(), 10)),
        vec!["09:00", "09:10"]
    );
}

#[test]
fn one_off_and_recurring_windows_union_on_the_same_date() {
    let date = d(2026, 3, 18); // Wednesday
    let rules = vec![
        once(date, t(14, 0), t(15, 0)),
        weekly(Weekday::Wed, t(9, 0), t(10, 0)),
    ];

    let times = offerable_times(&rules, date, 30);

    assert_eq!(format_times(&times), vec!["09:00", "09:30", "14:00", "14:30"]);
}

#[test]
fn overlapping_windows_are_deduplicated() {
    let rules = vec![
        weekly(Weekday::Mon, t(9, 0), t(11, 0)),
        weekly(Weekday::Mon, t(10, 0), t(12, 0)),
        once(monday(), t(10, 30), t(11, 30)),
    ];

    let times = offerable_times(&rules, monday(), 30);

    assert_eq!(
        format_times(&times),
        vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
    );
}

#[test]
fn misaligned_windows_keep_their_own_grid() {
    let rules = vec![
        weekly(Weekday::Mon, t(9, 0), t(10, 0)),
        weekly(Weekday::Mon, t(9, 15), t(10, 15)),
    ];

    let times = offerable_times(&rules, monday(), 30);

    assert_eq!(format_times(&times), vec!["09:00", "09:15", "09:30", "09:45"]);
}

#[test]
fn zero_width_rule_contributes_nothing() {
    let rules = vec![
        weekly(Weekday::Mon, t(10, 0), t(10, 0)),
        weekly(Weekday::Mon, t(13, 0), t(14, 0)),
    ];

    let times = offerable_times(&rules, monday(), 30);

    assert_eq!(format_times(&times), vec!["13:00", "13:30"]);
}

#[test]
fn inverted_window_contributes_nothing() {
    let rules = vec![weekly(Weekday::Mon, t(12, 0), t(9, 0))];

    assert!(offerable_times(&rules, monday(), 30).is_empty());
}

#[test]
fn inactive_rules_contribute_no_times() {
    let rules = vec![
        weekly(Weekday::Mon, t(9, 0), t(10, 0)).with_active(false),
        once(monday(), t(14, 0), t(15, 0)).with_active(false),
    ];

    assert!(offerable_times(&rules, monday(), 30).is_empty());
}

#[test]
fn no_matching_rule_yields_no_times() {
    let rules = vec![
        weekly(Weekday::Tue, t(9, 0), t(10, 0)),
        once(d(2026, 3, 17), t(9, 0), t(10, 0)),
    ];

    assert!(offerable_times(&rules, monday(), 30).is_empty());
}

#[test]
fn one_off_on_another_date_with_same_weekday_is_ignored() {
    let rules = vec![once(d(2026, 3, 23), t(9, 0), t(10, 0))];

    assert!(offerable_times(&rules, monday(), 30).is_empty());
}

#[test]
fn zero_granularity_yields_nothing() {
    let rules = vec![weekly(Weekday::Mon, t(9, 0), t(10, 0))];

    assert!(offerable_times(&rules, monday(), 0).is_empty());
}

#[test]
fn window_ending_at_last_minute_of_day_does_not_wrap() {
    let rules = vec![weekly(Weekday::Mon, t(22, 0), t(23, 59))];

    let times = offerable_times(&rules, monday(), 60);

    assert_eq!(format_times(&times), vec!["22:00", "23:00"]);
}

#[test]
fn hourly_granularity() {
    let rules = vec![weekly(Weekday::Mon, t(8, 0), t(12, 0))];

    let times = offerable_times(&rules, monday(), 60);

    assert_eq!(format_times(&times), vec!["08:00", "09:00", "10:00", "11:00"]);
}

// ── Purity ──────────────────────────────────────────────────────────────────

#[test]
fn repeated_calls_return_identical_results() {
    let rules = vec![
        weekly(Weekday::Mon, t(9, 0), t(12, 0)),
        once(d(2026, 3, 19), t(13, 0), t(15, 0)),
    ];

    assert_eq!(
        offerable_dates(&rules, monday(), 14),
        offerable_dates(&rules, monday(), 14)
    );
    assert_eq!(
        offerable_times(&rules, monday(), 30),
        offerable_times(&rules, monday(), 30)
    );
}

#[test]
fn rule_order_does_not_matter() {
    let mut rules = vec![
        once(d(2026, 3, 16), t(14, 0), t(15, 0)),
        weekly(Weekday::Mon, t(9, 0), t(10, 0)),
        weekly(Weekday::Thu, t(9, 0), t(10, 0)),
        once(d(2026, 3, 1), t(8, 0), t(9, 0)),
    ];
    let dates = offerable_dates(&rules, monday(), 14);
    let times = offerable_times(&rules, monday(), 30);

    rules.reverse();

    assert_eq!(offerable_dates(&rules, monday(), 14), dates);
    assert_eq!(offerable_times(&rules, monday(), 30), times);
}
