//! The full availability search: busy intervals in, offered slots out.
//!
//! Stage order matters and is fixed:
//!
//! ```text
//! busy ─▶ all-day filter ─▶ gap finder ─▶ weekday filter ─▶ time-of-day filter
//!      ─▶ fixed-slot splitter | minimum-duration filter ─▶ holiday filter ─▶ slots
//! ```
//!
//! The all-day and holiday stages run only when the request asks for them.
//! Free time is cut at local midnight before the weekday filter, so a gap over
//! a weekend is judged one date at a time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::filters::{
    clamp_to_time_window, drop_all_day_events, filter_by_min_duration, filter_by_weekdays,
    split_by_date, TimeWindow, WeekdaySet,
};
use crate::gaps::find_available_slots;
use crate::holiday::{filter_by_holidays, DateRange, Holiday, HolidayCalendar};
use crate::interval::{BusySlot, OfferedSlot};
use crate::splitter::split_into_fixed_slots;
use crate::timestamp::Timestamp;

/// How free time is shaped into offered slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SlotShape {
    /// Fixed-length meeting candidates on the 30-minute grid.
    Fixed { minutes: u32 },
    /// Free spans as found, at least `min_minutes` long.
    Free { min_minutes: u32 },
}

impl Default for SlotShape {
    fn default() -> Self {
        SlotShape::Fixed { minutes: 60 }
    }
}

/// Parameters of one availability search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Start of the searched range. Its offset is used for every output literal.
    pub range_start: Timestamp,
    pub range_end: Timestamp,
    #[serde(default)]
    pub weekdays: WeekdaySet,
    #[serde(default)]
    pub time_window: TimeWindow,
    #[serde(default)]
    pub shape: SlotShape,
    #[serde(default)]
    pub exclude_all_day_events: bool,
    #[serde(default)]
    pub exclude_holidays: bool,
}

impl SearchRequest {
    /// A request over `[range_start, range_end)` with every filter wide open.
    pub fn new(range_start: Timestamp, range_end: Timestamp) -> Self {
        Self {
            range_start,
            range_end,
            weekdays: WeekdaySet::ALL,
            time_window: TimeWindow::all_day(),
            shape: SlotShape::default(),
            exclude_all_day_events: false,
            exclude_holidays: false,
        }
    }

    /// The calendar dates spanned by the range, as written in its literals.
    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::new(self.range_start.date(), self.range_end.date())
    }

    /// Check the request before any stage runs.
    ///
    /// # Errors
    /// - `SlotError::InvalidDateRange` if the range start is after its end.
    /// - `SlotError::InvalidDuration` for a zero fixed-slot length.
    pub fn validate(&self) -> Result<()> {
        if self.range_start.instant() > self.range_end.instant() {
            return Err(SlotError::InvalidDateRange {
                start: self.range_start.to_string(),
                end: self.range_end.to_string(),
            });
        }
        if let SlotShape::Fixed { minutes: 0 } = self.shape {
            return Err(SlotError::InvalidDuration(
                "fixed slot duration must be at least one minute".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub slots: Vec<OfferedSlot>,
    /// Holidays that removed at least one slot. Empty unless the request
    /// excludes holidays.
    pub excluded_holidays: Vec<Holiday>,
}

/// Run the whole pipeline for one request.
///
/// An empty `slots` list is a valid answer (fully booked, or every slot
/// filtered out). Only structurally invalid input is an error.
///
/// # Errors
/// See [`SearchRequest::validate`].
#[tracing::instrument(skip_all, fields(range_start = %request.range_start, range_end = %request.range_end))]
pub fn find_offered_slots(
    busy: &[BusySlot],
    request: &SearchRequest,
    holidays: &HolidayCalendar,
) -> Result<SearchOutcome> {
    request.validate()?;

    let busy = if request.exclude_all_day_events {
        drop_all_day_events(busy)
    } else {
        busy.to_vec()
    };

    let free = find_available_slots(&busy, &request.range_start, &request.range_end)?;
    let free = split_by_date(&free);
    let free = filter_by_weekdays(&free, request.weekdays);
    let free = clamp_to_time_window(&free, &request.time_window);

    let slots = match request.shape {
        SlotShape::Fixed { minutes } => split_into_fixed_slots(&free, minutes)?,
        SlotShape::Free { min_minutes } => filter_by_min_duration(&free, min_minutes),
    };

    let outcome = if request.exclude_holidays {
        let filtered = filter_by_holidays(&slots, &request.date_range()?, holidays);
        SearchOutcome {
            slots: filtered.slots,
            excluded_holidays: filtered.excluded,
        }
    } else {
        SearchOutcome {
            slots,
            excluded_holidays: Vec::new(),
        }
    };

    debug!(offered = outcome.slots.len(), "search complete");
    Ok(outcome)
}
