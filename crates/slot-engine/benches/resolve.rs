use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{
    offerable_dates, offerable_times, AvailabilityRule, BookedSlot, FixedClock, ProviderSchedule,
    ResolverConfig, SlotResolver,
};
use std::hint::black_box;

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Split-shift weekdays plus a month of one-off extra sessions.
fn dense_rules() -> Vec<AvailabilityRule> {
    let weekdays = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];
    let mut rules: Vec<AvailabilityRule> = weekdays
        .iter()
        .flat_map(|&w| {
            [
                AvailabilityRule::recurring(w, t(8, 0), t(12, 0)),
                AvailabilityRule::recurring(w, t(13, 0), t(18, 0)),
            ]
        })
        .collect();
    for day in 1..=30 {
        let date = NaiveDate::from_ymd_opt(2026, 4, day).unwrap();
        rules.push(AvailabilityRule::one_off(date, t(18, 0), t(20, 0)));
    }
    rules
}

fn bench_resolve(c: &mut Criterion) {
    let rules = dense_rules();
    let today = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();

    c.bench_function("offerable_dates_dense_90d", |b| {
        b.iter(|| offerable_dates(black_box(&rules), black_box(today), 90))
    });

    c.bench_function("offerable_times_dense_15m", |b| {
        b.iter(|| offerable_times(black_box(&rules), black_box(today), 15))
    });

    let schedule = ProviderSchedule::new("bench", Tz::UTC, rules.clone());
    let bookings: Vec<BookedSlot> = (1..=30)
        .map(|day| BookedSlot::new(NaiveDate::from_ymd_opt(2026, 4, day).unwrap(), t(9, 0)))
        .collect();
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());
    let resolver = SlotResolver::with_clock(
        ResolverConfig {
            horizon_days: 30,
            ..ResolverConfig::default()
        },
        clock,
    );

    c.bench_function("bookable_slots_30d_with_bookings", |b| {
        b.iter(|| resolver.bookable_slots(black_box(&schedule), black_box(&bookings)))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
