//! RFC 5545 export of recurring rules.
//!
//! Recurring availability maps onto `FREQ=WEEKLY;BYDAY=<day>`. Expansion goes
//! through the `rrule` crate (v0.13), which gives calendar clients and the
//! resolver a common reference for which dates a rule covers.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rrule::RRuleSet;

use crate::error::{Result, SlotError};
use crate::rule::{AvailabilityRule, RuleSchedule};

/// Two-letter RFC 5545 weekday code.
pub fn byday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// RRULE body for a recurring rule (e.g. `FREQ=WEEKLY;BYDAY=MO`).
/// One-off rules have no recurrence and return `None`.
pub fn to_rrule(rule: &AvailabilityRule) -> Option<String> {
    match rule.schedule {
        RuleSchedule::Recurring { weekday } => {
            Some(format!("FREQ=WEEKLY;BYDAY={}", byday_code(weekday)))
        }
        RuleSchedule::OneOff { .. } => None,
    }
}

/// Expand a recurring rule into the dates it covers in `from .. from + horizon_days`.
///
/// Returns an empty list for one-off, inactive or malformed rules.
///
/// # Errors
/// Returns `SlotError::Recurrence` if the `rrule` crate rejects the generated rule.
pub fn expand_recurring_dates(
    rule: &AvailabilityRule,
    from: NaiveDate,
    horizon_days: u32,
) -> Result<Vec<NaiveDate>> {
    let Some(body) = to_rrule(rule) else {
        return Ok(Vec::new());
    };
    if !rule.active || !rule.is_well_formed() || horizon_days == 0 {
        return Ok(Vec::new());
    }
    let Some(end) = from.checked_add_days(Days::new(u64::from(horizon_days))) else {
        return Err(SlotError::Recurrence(format!(
            "horizon of {} days from {} is out of range",
            horizon_days, from
        )));
    };

    // One occurrence per started week, plus DTSTART when it is off-pattern.
    let count = horizon_days / 7 + 2;
    let limit = u16::try_from(count).unwrap_or(u16::MAX);

    let rrule_text = format!(
        "DTSTART;TZID=UTC:{}T{}\nRRULE:{};COUNT={}",
        from.format("%Y%m%d"),
        rule.start.format("%H%M%S"),
        body,
        count
    );

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| SlotError::Recurrence(format!("{}", e)))?;

    let RuleSchedule::Recurring { weekday } = rule.schedule else {
        return Ok(Vec::new());
    };

    let mut dates: Vec<NaiveDate> = rrule_set
        .all(limit)
        .dates
        .into_iter()
        .map(|dt| dt.date_naive())
        // DTSTART itself may be emitted even when it is not on BYDAY.
        .filter(|d| d.weekday() == weekday && *d >= from && *d < end)
        .collect();
    dates.dedup();

    Ok(dates)
}
