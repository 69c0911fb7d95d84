//! # slot-engine
//!
//! Deterministic availability-to-bookable-slot resolution for telehealth scheduling.
//!
//! A provider declares availability as weekly recurring windows and one-off
//! windows on specific dates. The engine turns that rule set into the dates a
//! patient can pick from and, for a chosen date, the start times on offer. Both
//! the patient booking flow and the provider schedule view call the same code.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{NaiveDate, NaiveTime, Weekday};
//! use slot_engine::{offerable_dates, offerable_times, AvailabilityRule};
//!
//! let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
//! let rules = vec![AvailabilityRule::recurring(Weekday::Mon, t(9, 0), t(9, 45))];
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let dates = offerable_dates(&rules, monday, 14);
//! assert_eq!(dates, vec![monday, NaiveDate::from_ymd_opt(2026, 3, 23).unwrap()]);
//!
//! let times = offerable_times(&rules, monday, 30);
//! assert_eq!(times, vec![t(9, 0), t(9, 30)]);
//! ```
//!
//! ## Modules
//!
//! - [`rule`] — Wire rows, typed rules, time/date parsing
//! - [`schedule`] — A provider's rule set plus its time zone
//! - [`resolver`] — Offerable dates/times and the clock-aware `SlotResolver`
//! - [`booking`] — Exclude slots that overlap existing bookings
//! - [`validate`] — Row validation with separately reported warnings
//! - [`recurrence`] — RFC 5545 RRULE export and expansion
//! - [`clock`] — Injected wall clock
//! - [`config`] — Resolver configuration
//! - [`error`] — Error types

pub mod booking;
pub mod clock;
pub mod config;
pub mod error;
pub mod recurrence;
pub mod resolver;
pub mod rule;
pub mod schedule;
pub mod validate;

pub use booking::{exclude_booked, find_booking_conflicts, BookedSlot, BookingConflict};
pub use clock::{parse_now, Clock, FixedClock, SystemClock};
pub use config::ResolverConfig;
pub use error::SlotError;
pub use resolver::{offerable_dates, offerable_times, ResolvedSlot, SlotResolver};
pub use rule::{AvailabilityRow, AvailabilityRule, RuleDefect, RuleKind, RuleSchedule};
pub use schedule::{ProviderSchedule, ScheduleDocument, ScheduleReport};
pub use validate::{validate_rows, validate_rows_for, RuleReport, RuleWarning};
