//! # slot-engine
//!
//! Deterministic common-free-time search across calendars.
//!
//! Given busy intervals from any number of calendars, the engine computes the
//! free time inside a search range and shapes it into offered meeting slots.
//! Every wall-clock reading comes from the timestamp literals themselves; the
//! host timezone is never consulted, so the same input produces byte-identical
//! output on any machine.
//!
//! ## Pipeline
//!
//! ```text
//! busy ─▶ all-day filter ─▶ gap finder ─▶ weekday ─▶ time-of-day ─▶ splitter ─▶ holidays
//! ```
//!
//! ```rust
//! use slot_engine::{find_offered_slots, HolidayCalendar, Interval, SearchRequest, SlotShape};
//!
//! let busy = vec![Interval::parse("2026-02-24T10:00:00+09:00", "2026-02-24T11:00:00+09:00").unwrap()];
//! let mut request = SearchRequest::new(
//!     "2026-02-24T09:00:00+09:00".parse().unwrap(),
//!     "2026-02-24T12:00:00+09:00".parse().unwrap(),
//! );
//! request.shape = SlotShape::Fixed { minutes: 60 };
//!
//! let outcome = find_offered_slots(&busy, &request, &HolidayCalendar::new()).unwrap();
//! let starts: Vec<String> = outcome.slots.iter().map(|s| s.start().to_string()).collect();
//! assert_eq!(starts, ["2026-02-24T09:00:00+09:00", "2026-02-24T11:00:00+09:00"]);
//! ```
//!
//! ## Modules
//!
//! - [`timestamp`]: Timestamp literals with explicit offset tokens
//! - [`interval`]: `Interval`, `BusySlot`, `OfferedSlot`
//! - [`merge`]: Collapse overlapping busy intervals
//! - [`gaps`]: Free intervals inside a range
//! - [`filters`]: Weekday, time-of-day, minimum-duration, all-day filters
//! - [`splitter`]: Fixed-length grid-aligned candidates
//! - [`holiday`]: Holiday table and exclusion
//! - [`contiguous`]: Merge adjacent offered slots for display
//! - [`pipeline`]: The whole search in one call
//! - [`source`]: Free/busy source response shape
//! - [`share`]: Text, mailto, voting, Slack and Teams formatters
//! - [`error`]: Error types

pub mod contiguous;
pub mod error;
pub mod filters;
pub mod gaps;
pub mod holiday;
pub mod interval;
pub mod merge;
pub mod pipeline;
pub mod share;
pub mod source;
pub mod splitter;
pub mod timestamp;

pub use contiguous::merge_contiguous_slots;
pub use error::SlotError;
pub use filters::{
    clamp_to_time_window, drop_all_day_events, filter_by_min_duration, filter_by_weekdays,
    split_by_date, TimeWindow, WeekdaySet,
};
pub use gaps::find_available_slots;
pub use holiday::{filter_by_holidays, DateRange, Holiday, HolidayCalendar, HolidayFiltered};
pub use interval::{BusySlot, Interval, OfferedSlot};
pub use merge::merge_busy_slots;
pub use pipeline::{find_offered_slots, SearchOutcome, SearchRequest, SlotShape};
pub use share::ShareFormat;
pub use source::FreeBusyResponse;
pub use splitter::{split_into_fixed_slots, SLOT_GRID_MINUTES};
pub use timestamp::{Timestamp, UtcOffset};
