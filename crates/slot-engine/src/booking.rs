//! Exclude slots that collide with existing bookings.
//!
//! A slot occupies `[time, time + session)` and a booking occupies
//! `[time, time + duration)`. They collide when `a.start < b.end && b.start < a.end`,
//! so a booking that ends exactly when a slot starts does not block it.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::resolver::ResolvedSlot;

/// Booking statuses that no longer hold the time.
const RELEASED_STATUSES: &[&str] = &["cancelled", "canceled", "declined", "rejected"];

/// An existing booking, as read from the bookings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlot {
    #[serde(alias = "appointmentDate", alias = "appointment_date")]
    pub date: NaiveDate,
    #[serde(
        alias = "appointmentTime",
        alias = "appointment_time",
        with = "crate::rule::hhmm"
    )]
    pub time: NaiveTime,
    /// Booked length; the resolver's session length when absent.
    #[serde(default, alias = "duration_minutes", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl BookedSlot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time,
            duration_minutes: None,
            status: None,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Whether this booking still occupies its time. Cancelled and declined
    /// bookings do not.
    pub fn holds_time(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => !RELEASED_STATUSES
                .iter()
                .any(|released| status.eq_ignore_ascii_case(released)),
            None => true,
        }
    }

    fn interval(&self, default_minutes: u32) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.date.and_time(self.time);
        let minutes = self.duration_minutes.unwrap_or(default_minutes);
        (start, start + Duration::minutes(i64::from(minutes)))
    }
}

/// A candidate slot that collides with a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConflict {
    pub slot: ResolvedSlot,
    pub booking: BookedSlot,
    pub overlap_minutes: i64,
}

/// Find every (slot, booking) pair on `date` that overlaps.
pub fn find_booking_conflicts(
    date: NaiveDate,
    times: &[NaiveTime],
    bookings: &[BookedSlot],
    session_minutes: u32,
) -> Vec<BookingConflict> {
    let session = Duration::minutes(i64::from(session_minutes));
    let mut conflicts = Vec::new();

    for &time in times {
        let slot_start = date.and_time(time);
        let slot_end = slot_start + session;

        for booking in bookings.iter().filter(|b| b.holds_time()) {
            let (booking_start, booking_end) = booking.interval(session_minutes);
            if slot_start < booking_end && booking_start < slot_end {
                let overlap_start = slot_start.max(booking_start);
                let overlap_end = slot_end.min(booking_end);
                conflicts.push(BookingConflict {
                    slot: ResolvedSlot { date, time },
                    booking: booking.clone(),
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    conflicts
}

/// Keep only the `times` on `date` whose session overlaps no booking.
pub fn exclude_booked(
    date: NaiveDate,
    times: &[NaiveTime],
    bookings: &[BookedSlot],
    session_minutes: u32,
) -> Vec<NaiveTime> {
    let conflicts = find_booking_conflicts(date, times, bookings, session_minutes);
    if conflicts.is_empty() {
        return times.to_vec();
    }
    times
        .iter()
        .copied()
        .filter(|time| !conflicts.iter().any(|c| c.slot.time == *time))
        .collect()
}
