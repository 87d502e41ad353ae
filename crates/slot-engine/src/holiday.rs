//! Holiday exclusion.
//!
//! The holiday table is external data: a `YYYY-MM-DD → name` mapping supplied
//! by the caller and trusted as complete for the searched range. This module
//! does no holiday computation of its own.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::OfferedSlot;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    /// Returns `SlotError::InvalidDateRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SlotError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A single named holiday.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Date → holiday name table.
///
/// Serializes as a plain map keyed by `YYYY-MM-DD`, which is also the layout
/// of a `[holidays]` TOML table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayCalendar {
    entries: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(date, name)` string pairs.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidHoliday` if a date is not `YYYY-MM-DD`.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut calendar = Self::new();
        for (date, name) in entries {
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|e| SlotError::InvalidHoliday(format!("'{}': {}", date, e)))?;
            calendar.insert(date, name);
        }
        Ok(calendar)
    }

    pub fn insert(&mut self, date: NaiveDate, name: impl Into<String>) {
        self.entries.insert(date, name.into());
    }

    /// Merge another table into this one. Entries from `other` win on conflict.
    pub fn extend(&mut self, other: HolidayCalendar) {
        self.entries.extend(other.entries);
    }

    pub fn name_of(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Holidays inside `range`, in date order.
    pub fn within(&self, range: &DateRange) -> Vec<Holiday> {
        self.entries
            .range(range.start..=range.end)
            .map(|(date, name)| Holiday {
                date: *date,
                name: name.clone(),
            })
            .collect()
    }
}

/// Output of [`filter_by_holidays`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HolidayFiltered {
    /// Slots that survived the filter, in input order.
    pub slots: Vec<OfferedSlot>,
    /// Holidays that removed at least one slot, in date order.
    pub excluded: Vec<Holiday>,
}

/// Drop slots whose start date is a holiday within `range`.
///
/// Holidays outside `range` are ignored. The `excluded` list reports only the
/// holidays that actually removed a slot, so a holiday in range with no
/// candidate slots on it is not reported.
pub fn filter_by_holidays(
    slots: &[OfferedSlot],
    range: &DateRange,
    holidays: &HolidayCalendar,
) -> HolidayFiltered {
    let in_range: BTreeMap<NaiveDate, String> = holidays
        .within(range)
        .into_iter()
        .map(|h| (h.date, h.name))
        .collect();

    let mut hit: BTreeSet<NaiveDate> = BTreeSet::new();
    let kept: Vec<OfferedSlot> = slots
        .iter()
        .filter(|slot| {
            let date = slot.start().date();
            if in_range.contains_key(&date) {
                hit.insert(date);
                false
            } else {
                true
            }
        })
        .copied()
        .collect();

    let excluded: Vec<Holiday> = hit
        .into_iter()
        .filter_map(|date| {
            in_range.get(&date).map(|name| Holiday {
                date,
                name: name.clone(),
            })
        })
        .collect();

    debug!(
        input = slots.len(),
        kept = kept.len(),
        holidays_in_range = in_range.len(),
        excluded = excluded.len(),
        "holiday filter"
    );

    HolidayFiltered {
        slots: kept,
        excluded,
    }
}
