//! Availability rules -- the wire row as stored by the persistence layer and the
//! typed rule the resolver consumes.
//!
//! A typed [`AvailabilityRule`] is either recurring (fixed weekday) or one-off
//! (fixed calendar date), never both and never neither. The wire
//! [`AvailabilityRow`] carries optional fields and is checked on conversion;
//! each rejected row maps to exactly one [`RuleDefect`].

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, SlotError};

/// Output format for time-of-day values (zero-padded, 24-hour).
pub const TIME_FORMAT: &str = "%H:%M";

/// Output format for calendar dates (ISO 8601).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a time-of-day string.
///
/// Accepts `HH:MM` and `HH:MM:SS`; the persistence layer renders `time`
/// columns with seconds.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_FORMAT))
        .map_err(|_| SlotError::InvalidTime(s.to_string()))
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| SlotError::InvalidDate(s.to_string()))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a list of times as `HH:MM` strings.
pub fn format_times(times: &[NaiveTime]) -> Vec<String> {
    times.iter().map(|t| format_time(*t)).collect()
}

/// Format a list of dates as `YYYY-MM-DD` strings.
pub fn format_dates(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().map(|d| format_date(*d)).collect()
}

/// Map a stored day index (Sunday = 0 .. Saturday = 6) to a [`Weekday`].
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Inverse of [`weekday_from_index`].
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Serde adapter that renders a [`NaiveTime`] as `HH:MM` and accepts
/// `HH:MM` or `HH:MM:SS` on input.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

/// Declared kind of a stored rule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    #[serde(alias = "Recurring", alias = "weekly")]
    Recurring,
    #[serde(alias = "OneOff", alias = "oneOff", alias = "one-off", alias = "specific")]
    OneOff,
}

/// An availability rule row exactly as the persistence layer returns it.
///
/// Field names follow the API's camelCase; the table's snake_case column
/// names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "provider_id")]
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RuleKind>,
    #[serde(default, alias = "day_of_week", skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<i64>,
    #[serde(default, alias = "specific_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(alias = "start_time")]
    pub start_time: String,
    #[serde(alias = "end_time")]
    pub end_time: String,
    #[serde(default = "default_active", alias = "is_active", alias = "isActive")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Why a stored row could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RuleDefect {
    #[error("rule has neither a weekday nor a date")]
    MissingSchedule,

    #[error("rule has both a weekday and a date")]
    AmbiguousSchedule,

    #[error("day of week {0} is outside 0..=6")]
    DayOfWeekOutOfRange(i64),

    #[error("unparseable time of day '{0}'")]
    InvalidTime(String),

    #[error("unparseable date '{0}'")]
    InvalidDate(String),

    #[error("start time is not before end time")]
    EmptyWindow,

    #[error("rule belongs to provider '{0}'")]
    ForeignProvider(String),

    #[error("{window_minutes}-minute window is narrower than the {granularity_minutes}-minute slot step")]
    NarrowWindow {
        window_minutes: i64,
        granularity_minutes: u32,
    },
}

/// When a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSchedule {
    /// Repeats every week on this weekday.
    Recurring { weekday: Weekday },
    /// Applies to exactly this date.
    OneOff { date: NaiveDate },
}

/// A typed availability window for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRule {
    pub id: Option<String>,
    pub provider_id: String,
    pub schedule: RuleSchedule,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub active: bool,
}

impl AvailabilityRule {
    /// An active weekly rule with no provider or id attached.
    pub fn recurring(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: None,
            provider_id: String::new(),
            schedule: RuleSchedule::Recurring { weekday },
            start,
            end,
            active: true,
        }
    }

    /// An active single-date rule with no provider or id attached.
    pub fn one_off(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: None,
            provider_id: String::new(),
            schedule: RuleSchedule::OneOff { date },
            start,
            end,
            active: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = provider_id.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// `start < end`. Rules failing this contribute nothing to resolution.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Width of the window in minutes (zero or negative when malformed).
    pub fn window_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether this rule's schedule covers `date`. Ignores `active`.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        match self.schedule {
            RuleSchedule::Recurring { weekday } => date.weekday() == weekday,
            RuleSchedule::OneOff { date: on } => on == date,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.schedule, RuleSchedule::Recurring { .. })
    }
}

impl TryFrom<AvailabilityRow> for AvailabilityRule {
    type Error = RuleDefect;

    fn try_from(row: AvailabilityRow) -> std::result::Result<Self, Self::Error> {
        let schedule = match (row.kind, row.day_of_week, row.date.as_deref()) {
            (_, Some(_), Some(_)) => return Err(RuleDefect::AmbiguousSchedule),
            (Some(RuleKind::Recurring) | None, Some(index), None) => {
                let weekday =
                    weekday_from_index(index).ok_or(RuleDefect::DayOfWeekOutOfRange(index))?;
                RuleSchedule::Recurring { weekday }
            }
            (Some(RuleKind::OneOff) | None, None, Some(raw)) => {
                let date = parse_date(raw).map_err(|_| RuleDefect::InvalidDate(raw.to_string()))?;
                RuleSchedule::OneOff { date }
            }
            // The field the declared kind requires is absent.
            (Some(RuleKind::Recurring), None, Some(_)) | (Some(RuleKind::OneOff), Some(_), None) => {
                return Err(RuleDefect::MissingSchedule)
            }
            (_, None, None) => return Err(RuleDefect::MissingSchedule),
        };

        let start = parse_time(&row.start_time)
            .map_err(|_| RuleDefect::InvalidTime(row.start_time.clone()))?;
        let end =
            parse_time(&row.end_time).map_err(|_| RuleDefect::InvalidTime(row.end_time.clone()))?;
        if start >= end {
            return Err(RuleDefect::EmptyWindow);
        }

        Ok(Self {
            id: row.id,
            provider_id: row.provider_id,
            schedule,
            start,
            end,
            active: row.active,
        })
    }
}

impl From<&AvailabilityRule> for AvailabilityRow {
    fn from(rule: &AvailabilityRule) -> Self {
        let (kind, day_of_week, date) = match rule.schedule {
            RuleSchedule::Recurring { weekday } => {
                (RuleKind::Recurring, Some(weekday_index(weekday) as i64), None)
            }
            RuleSchedule::OneOff { date } => (RuleKind::OneOff, None, Some(format_date(date))),
        };
        Self {
            id: rule.id.clone(),
            provider_id: rule.provider_id.clone(),
            kind: Some(kind),
            day_of_week,
            date,
            start_time: format_time(rule.start),
            end_time: format_time(rule.end),
            active: rule.active,
        }
    }
}
