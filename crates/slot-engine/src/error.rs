//! Error types for slot-engine operations.
//!
//! Only structural input problems are errors. A search that finds nothing
//! returns an empty result, never an `Err`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// An interval whose start is after its end.
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: String, end: String },

    /// A daily window whose start is at or after its end.
    #[error("Invalid time window: {start} must be before {end}")]
    InvalidTimeWindow { start: String, end: String },

    /// A search range whose start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid weekday index: {0} (expected 0=Sunday..6=Saturday)")]
    InvalidWeekday(u8),

    #[error("Invalid holiday entry: {0}")]
    InvalidHoliday(String),

    /// A free/busy response whose calendar entries are missing their data.
    #[error("Invalid free/busy response: {0}")]
    InvalidFreeBusy(String),

    #[error("Unknown share format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
