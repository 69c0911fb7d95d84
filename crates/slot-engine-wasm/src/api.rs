//! JSON-in, JSON-out entry points behind the WASM exports.
//!
//! Kept free of `wasm-bindgen` types so they run (and are tested) on native
//! targets. Errors are human-readable strings that the exports hand to
//! JavaScript unchanged.

use chrono_tz::Tz;
use serde::Serialize;
use slot_engine::rule::{format_dates, format_times, parse_date};
use slot_engine::validate::RuleWarning;
use slot_engine::{
    parse_now, BookedSlot, Clock, ProviderSchedule, ResolverConfig, ScheduleReport, SlotResolver,
    SystemClock,
};

/// Result type for the JSON API: output JSON or an error message.
pub type ApiResult = Result<String, String>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationDto<'a> {
    provider_id: &'a str,
    timezone: &'static str,
    rule_count: usize,
    warnings: &'a [RuleWarning],
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> ApiResult {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn load_config(config_json: Option<&str>) -> Result<ResolverConfig, String> {
    match config_json {
        Some(json) if !json.trim().is_empty() => ResolverConfig::from_json(json)
            .map_err(|e| e.to_string()),
        _ => Ok(ResolverConfig::default()),
    }
}

fn load_schedule(schedule_json: &str, granularity_minutes: u32) -> Result<ScheduleReport, String> {
    ProviderSchedule::from_json(schedule_json, granularity_minutes)
        .map_err(|e| format!("Invalid schedule JSON: {}", e))
}

fn clock_for(now: Option<&str>, tz: Tz) -> Result<Box<dyn Clock>, String> {
    match now {
        Some(now) if !now.trim().is_empty() => parse_now(now, tz)
            .map(|clock| Box::new(clock) as Box<dyn Clock>)
            .map_err(|e| e.to_string()),
        _ => Ok(Box::new(SystemClock)),
    }
}

/// Offerable dates as a JSON array of `YYYY-MM-DD` strings.
///
/// `now` pins the clock (RFC 3339, local `YYYY-MM-DDTHH:MM`, or `YYYY-MM-DD`);
/// the system clock is used when absent.
pub fn offerable_dates(
    schedule_json: &str,
    now: Option<&str>,
    horizon_days: Option<u32>,
) -> ApiResult {
    let mut config = ResolverConfig::default();
    if let Some(horizon_days) = horizon_days {
        config.horizon_days = horizon_days;
    }
    config.validate().map_err(|e| e.to_string())?;

    let report = load_schedule(schedule_json, config.granularity_minutes)?;
    let clock = clock_for(now, report.schedule.timezone)?;
    let resolver = SlotResolver::with_clock(config, clock);

    to_json(&format_dates(&resolver.offerable_dates(&report.schedule)))
}

/// Offerable times on `date` as a JSON array of `HH:MM` strings.
pub fn offerable_times(
    schedule_json: &str,
    date: &str,
    granularity_minutes: Option<u32>,
) -> ApiResult {
    let mut config = ResolverConfig::default();
    if let Some(granularity_minutes) = granularity_minutes {
        config.granularity_minutes = granularity_minutes;
    }
    config.validate().map_err(|e| e.to_string())?;

    let date = parse_date(date).map_err(|e| e.to_string())?;
    let report = load_schedule(schedule_json, config.granularity_minutes)?;
    let times = slot_engine::offerable_times(&report.schedule.rules, date, config.granularity_minutes);

    to_json(&format_times(&times))
}

/// Bookable slots as a JSON array of `{date, time}` objects.
///
/// `bookings_json` is a JSON array of booking rows (may be empty or `null`).
pub fn bookable_slots(
    schedule_json: &str,
    bookings_json: &str,
    now: Option<&str>,
    config_json: Option<&str>,
) -> ApiResult {
    let config = load_config(config_json)?;
    let report = load_schedule(schedule_json, config.granularity_minutes)?;

    let bookings: Vec<BookedSlot> = match bookings_json.trim() {
        "" | "null" => Vec::new(),
        json => serde_json::from_str(json).map_err(|e| format!("Invalid bookings JSON: {}", e))?,
    };

    let clock = clock_for(now, report.schedule.timezone)?;
    let resolver = SlotResolver::with_clock(config, clock);

    to_json(&resolver.bookable_slots(&report.schedule, &bookings))
}

/// Validation summary: `{providerId, timezone, ruleCount, warnings}`.
pub fn validate_schedule(schedule_json: &str, granularity_minutes: Option<u32>) -> ApiResult {
    let granularity_minutes =
        granularity_minutes.unwrap_or(slot_engine::config::DEFAULT_GRANULARITY_MINUTES);
    let report = load_schedule(schedule_json, granularity_minutes)?;

    to_json(&ValidationDto {
        provider_id: &report.schedule.provider_id,
        timezone: report.schedule.timezone.name(),
        rule_count: report.schedule.rules.len(),
        warnings: &report.warnings,
    })
}
