//! Injected wall clock.
//!
//! Resolution never reads the system time implicitly; callers hand a [`Clock`]
//! to the [`SlotResolver`](crate::resolver::SlotResolver) so tests can pin "now".

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock date/time in `tz`.
    fn local_now(&self, tz: Tz) -> NaiveDateTime {
        self.now().with_timezone(&tz).naive_local()
    }

    /// Current calendar date in `tz`.
    fn today(&self, tz: Tz) -> NaiveDate {
        self.local_now(tz).date()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Midnight UTC at the start of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::default()).and_utc())
    }

    /// A wall-clock instant in `tz`. Ambiguous local times resolve to the
    /// earlier instant; nonexistent ones (DST gap) yield `None`.
    pub fn at_local(local: NaiveDateTime, tz: Tz) -> Option<Self> {
        tz.from_local_datetime(&local)
            .earliest()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse a caller-supplied "now" into a [`FixedClock`].
///
/// RFC 3339 strings carry their own offset. Naive `YYYY-MM-DDTHH:MM[:SS]`
/// values are read as wall-clock time in `tz`. A bare `YYYY-MM-DD` date is the
/// first instant of that day in `tz`, which is later than midnight when a DST
/// jump skips midnight.
pub fn parse_now(s: &str, tz: Tz) -> Result<FixedClock> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(FixedClock(dt.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return start_of_day(date, tz).ok_or_else(|| {
            SlotError::InvalidDate(format!("{} has no valid instant in {}", s, tz.name()))
        });
    }
    let local = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| SlotError::InvalidDate(s.to_string()))?;
    FixedClock::at_local(local, tz).ok_or_else(|| {
        SlotError::InvalidDate(format!("{} does not exist in {}", s, tz.name()))
    })
}

/// Earliest existing wall-clock minute of `date` in `tz`.
fn start_of_day(date: NaiveDate, tz: Tz) -> Option<FixedClock> {
    let midnight = date.and_time(NaiveTime::default());
    (0..24 * 60)
        .map(|minute| midnight + Duration::minutes(minute))
        .take_while(|local| local.date() == date)
        .find_map(|local| FixedClock::at_local(local, tz))
}
