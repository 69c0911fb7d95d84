//! Tests for RRULE export and `rrule`-backed expansion.

use chrono::{NaiveDate, NaiveTime, Weekday};
use slot_engine::offerable_dates;
use slot_engine::recurrence::{byday_code, expand_recurring_dates, to_rrule};
use slot_engine::AvailabilityRule;

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn recurring_rule_renders_weekly_byday() {
    let rule = AvailabilityRule::recurring(Weekday::Thu, t(9, 0), t(10, 0));

    assert_eq!(to_rrule(&rule).as_deref(), Some("FREQ=WEEKLY;BYDAY=TH"));
}

#[test]
fn one_off_rule_has_no_rrule() {
    let rule = AvailabilityRule::one_off(d(2026, 3, 18), t(9, 0), t(10, 0));

    assert_eq!(to_rrule(&rule), None);
    assert!(expand_recurring_dates(&rule, d(2026, 3, 16), 14)
        .unwrap()
        .is_empty());
}

#[test]
fn byday_codes_cover_the_week() {
    let codes: Vec<&str> = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
    .into_iter()
    .map(byday_code)
    .collect();

    assert_eq!(codes, vec!["SU", "MO", "TU", "WE", "TH", "FR", "SA"]);
}

#[test]
fn expansion_from_a_monday_covers_two_mondays() {
    let rule = AvailabilityRule::recurring(Weekday::Mon, t(10, 0), t(11, 0));

    let dates = expand_recurring_dates(&rule, d(2026, 3, 16), 14).unwrap();

    assert_eq!(dates, vec![d(2026, 3, 16), d(2026, 3, 23)]);
}

#[test]
fn five_week_expansion_keeps_the_weekday() {
    let rule = AvailabilityRule::recurring(Weekday::Sun, t(2, 30), t(3, 30));

    let dates = expand_recurring_dates(&rule, d(2026, 3, 1), 35).unwrap();

    assert_eq!(
        dates,
        vec![
            d(2026, 3, 1),
            d(2026, 3, 8),
            d(2026, 3, 15),
            d(2026, 3, 22),
            d(2026, 3, 29),
        ]
    );
}

#[test]
fn inactive_and_malformed_rules_expand_to_nothing() {
    let inactive = AvailabilityRule::recurring(Weekday::Mon, t(9, 0), t(10, 0)).with_active(false);
    let inverted = AvailabilityRule::recurring(Weekday::Mon, t(10, 0), t(9, 0));

    assert!(expand_recurring_dates(&inactive, d(2026, 3, 16), 14)
        .unwrap()
        .is_empty());
    assert!(expand_recurring_dates(&inverted, d(2026, 3, 16), 14)
        .unwrap()
        .is_empty());
}

#[test]
fn expansion_agrees_with_offerable_dates_for_every_weekday_and_start() {
    let weekdays = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    for weekday in weekdays {
        for start_day in 16..=22 {
            for horizon in [1, 6, 7, 13, 14, 30] {
                let rule = AvailabilityRule::recurring(weekday, t(9, 0), t(17, 0));
                let from = d(2026, 3, start_day);

                let via_rrule = expand_recurring_dates(&rule, from, horizon).unwrap();
                let via_resolver = offerable_dates(std::slice::from_ref(&rule), from, horizon);

                assert_eq!(
                    via_rrule, via_resolver,
                    "{:?} from {} over {} days",
                    weekday, from, horizon
                );
            }
        }
    }
}
