//! Availability rules -> offerable dates and times.
//!
//! The two free functions, [`offerable_dates`] and [`offerable_times`], are pure
//! and total: they never fail, and a rule that is inactive or malformed simply
//! contributes nothing. [`SlotResolver`] wraps them with a config, an injected
//! clock and the provider's time zone, and adds [`SlotResolver::bookable_slots`]
//! which also removes past and already-booked slots.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::booking::{exclude_booked, BookedSlot};
use crate::clock::{Clock, SystemClock};
use crate::config::ResolverConfig;
use crate::rule::{self, AvailabilityRule, RuleSchedule};
use crate::schedule::ProviderSchedule;

/// A concrete bookable (date, start time) pair. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolvedSlot {
    pub date: NaiveDate,
    #[serde(with = "crate::rule::hhmm")]
    pub time: NaiveTime,
}

impl fmt::Display for ResolvedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            rule::format_date(self.date),
            rule::format_time(self.time)
        )
    }
}

/// Whether a rule takes part in resolution at all.
fn contributes(rule: &AvailabilityRule) -> bool {
    if !rule.active {
        return false;
    }
    if !rule.is_well_formed() {
        tracing::debug!(
            rule_id = ?rule.id,
            start = %rule.start,
            end = %rule.end,
            "skipping availability rule with empty window"
        );
        return false;
    }
    true
}

/// List the dates on which `rules` offer availability.
///
/// Every active one-off date is included as-is, even when it lies before
/// `today`. Recurring rules are expanded over `today .. today + horizon_days`.
/// The result is sorted ascending with no duplicates.
pub fn offerable_dates(
    rules: &[AvailabilityRule],
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<NaiveDate> {
    let mut dates = BTreeSet::new();
    // Indexed by days-from-Sunday.
    let mut weekdays = [false; 7];

    for rule in rules.iter().filter(|r| contributes(r)) {
        match rule.schedule {
            RuleSchedule::OneOff { date } => {
                dates.insert(date);
            }
            RuleSchedule::Recurring { weekday } => {
                weekdays[weekday.num_days_from_sunday() as usize] = true;
            }
        }
    }

    if weekdays.iter().any(|&w| w) {
        for offset in 0..u64::from(horizon_days) {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            if weekdays[date.weekday().num_days_from_sunday() as usize] {
                dates.insert(date);
            }
        }
    }

    dates.into_iter().collect()
}

/// Expand one rule's window into start times at `step` intervals.
///
/// Times run from `start` while strictly before `end`. A window narrower than
/// one step yields nothing.
fn expand_window(rule: &AvailabilityRule, step: Duration, out: &mut BTreeSet<NaiveTime>) {
    if rule.end - rule.start < step {
        return;
    }
    let mut cursor = rule.start;
    while cursor < rule.end {
        out.insert(cursor);
        let (next, wrapped) = cursor.overflowing_add_signed(step);
        // Stepping past midnight would restart the day.
        if wrapped != 0 {
            break;
        }
        cursor = next;
    }
}

/// Whether a session starting at `time` on `date` ends inside some window
/// that offers it.
fn session_fits(
    rules: &[AvailabilityRule],
    date: NaiveDate,
    time: NaiveTime,
    session: Duration,
) -> bool {
    let end = date.and_time(time) + session;
    rules
        .iter()
        .filter(|r| r.applies_to(date) && contributes(r))
        .any(|r| r.start <= time && end <= date.and_time(r.end))
}

/// List the start times offered on `date`, at `granularity_minutes` steps.
///
/// Unions the windows of every active one-off rule for `date` and every active
/// recurring rule for its weekday. Sorted ascending, no duplicates. A zero
/// granularity yields nothing.
pub fn offerable_times(
    rules: &[AvailabilityRule],
    date: NaiveDate,
    granularity_minutes: u32,
) -> Vec<NaiveTime> {
    if granularity_minutes == 0 {
        tracing::debug!("zero slot granularity, no times offered");
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(granularity_minutes));

    let mut times = BTreeSet::new();
    for rule in rules
        .iter()
        .filter(|r| r.applies_to(date))
        .filter(|r| contributes(r))
    {
        expand_window(rule, step, &mut times);
    }

    times.into_iter().collect()
}

/// Resolver bound to a config and a clock.
///
/// Holds no mutable state; one instance can serve any number of schedules,
/// concurrently.
#[derive(Debug, Clone)]
pub struct SlotResolver<C: Clock = SystemClock> {
    config: ResolverConfig,
    clock: C,
}

impl SlotResolver<SystemClock> {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for SlotResolver<SystemClock> {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl<C: Clock> SlotResolver<C> {
    pub fn with_clock(config: ResolverConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Today's date in the provider's time zone.
    pub fn today(&self, schedule: &ProviderSchedule) -> NaiveDate {
        self.clock.today(schedule.timezone)
    }

    /// [`offerable_dates`] over the configured horizon, starting from the
    /// provider's today. Past one-off dates are dropped unless
    /// `include_past_one_offs` is set.
    pub fn offerable_dates(&self, schedule: &ProviderSchedule) -> Vec<NaiveDate> {
        let today = self.today(schedule);
        let mut dates = offerable_dates(&schedule.rules, today, self.config.horizon_days);
        if !self.config.include_past_one_offs {
            dates.retain(|d| *d >= today);
        }
        dates
    }

    /// [`offerable_times`] at the configured granularity.
    pub fn offerable_times(&self, schedule: &ProviderSchedule, date: NaiveDate) -> Vec<NaiveTime> {
        offerable_times(&schedule.rules, date, self.config.granularity_minutes)
    }

    /// Session length for `schedule`: its own `session_minutes`, else the
    /// configured one, else the slot step.
    pub fn session_minutes(&self, schedule: &ProviderSchedule) -> u32 {
        schedule
            .session_minutes
            .unwrap_or_else(|| self.config.session_minutes())
    }

    /// Every slot a patient could book right now.
    ///
    /// Covers each offerable date in `today .. today + horizon_days`; one-off
    /// dates beyond the horizon are not bookable yet. A slot is dropped when it
    /// starts before the provider's current wall-clock time, when its session
    /// would run past the end of every window offering it, or when the session
    /// overlaps one of `bookings`. Ordered by date, then time.
    pub fn bookable_slots(
        &self,
        schedule: &ProviderSchedule,
        bookings: &[BookedSlot],
    ) -> Vec<ResolvedSlot> {
        let now = self.clock.local_now(schedule.timezone);
        let today = now.date();
        let horizon_end = today.checked_add_days(Days::new(u64::from(self.config.horizon_days)));
        let session_minutes = self.session_minutes(schedule);
        let session = Duration::minutes(i64::from(session_minutes));

        let mut slots = Vec::new();
        for date in offerable_dates(&schedule.rules, today, self.config.horizon_days) {
            if date < today || horizon_end.is_some_and(|end| date >= end) {
                continue;
            }
            let times: Vec<NaiveTime> = self
                .offerable_times(schedule, date)
                .into_iter()
                .filter(|time| session_fits(&schedule.rules, date, *time, session))
                .collect();
            let open = exclude_booked(date, &times, bookings, session_minutes);
            slots.extend(
                open.into_iter()
                    .filter(|time| date.and_time(*time) >= now)
                    .map(|time| ResolvedSlot { date, time }),
            );
        }

        tracing::debug!(
            provider_id = %schedule.provider_id,
            %today,
            slots = slots.len(),
            bookings = bookings.len(),
            "resolved bookable slots"
        );
        slots
    }
}
