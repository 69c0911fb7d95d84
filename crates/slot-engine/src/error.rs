//! Error types for slot-engine boundary operations.
//!
//! The resolver itself is total. These errors only surface when parsing rows,
//! schedules, bookings or configuration, and when expanding RRULEs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid resolver config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recurrence error: {0}")]
    Recurrence(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
