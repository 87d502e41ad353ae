//! The simple pipeline filters: weekday, time-of-day, minimum duration, and
//! the all-day busy-event filter.
//!
//! All wall-clock reads come straight from the timestamp literals. Nothing
//! here converts through a timezone database.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::{BusySlot, OfferedSlot};
use crate::timestamp::{Timestamp, MINUTES_PER_DAY};

// ── Weekday filter ──────────────────────────────────────────────────────────

/// A set of allowed weekdays, indexed 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    pub const ALL: WeekdaySet = WeekdaySet(0b111_1111);
    /// Monday through Friday.
    pub const WEEKDAYS: WeekdaySet = WeekdaySet(0b011_1110);

    /// Build from Sunday-based indices. Duplicates are ignored.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidWeekday` for any index above 6.
    pub fn from_indices(indices: &[u8]) -> Result<Self> {
        let mut bits = 0u8;
        for &i in indices {
            if i > 6 {
                return Err(SlotError::InvalidWeekday(i));
            }
            bits |= 1 << i;
        }
        Ok(WeekdaySet(bits))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    /// The Sunday-based indices in ascending order.
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|i| self.0 & (1 << i) != 0).collect()
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        WeekdaySet::ALL
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = SlotError;

    fn try_from(indices: Vec<u8>) -> Result<Self> {
        WeekdaySet::from_indices(&indices)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices()
    }
}

/// Weekday of a literal calendar date.
///
/// `NaiveDate` carries no time of day and no zone, so the weekday is fixed by
/// the date as written; no midnight boundary can shift it.
fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// Keep slots whose start date falls on an allowed weekday. Slots are kept or
/// dropped whole.
pub fn filter_by_weekdays(slots: &[OfferedSlot], allowed: WeekdaySet) -> Vec<OfferedSlot> {
    let kept: Vec<OfferedSlot> = slots
        .iter()
        .filter(|slot| allowed.contains(weekday_of(slot.start().date())))
        .copied()
        .collect();
    debug!(input = slots.len(), kept = kept.len(), "weekday filter");
    kept
}

// ── Time-of-day filter ──────────────────────────────────────────────────────

/// An allowed daily wall-clock window `[start, end)`, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow", into = "RawTimeWindow")]
pub struct TimeWindow {
    start: u32,
    end: u32,
}

#[derive(Serialize, Deserialize)]
struct RawTimeWindow {
    start: String,
    end: String,
}

impl TimeWindow {
    /// # Errors
    /// Returns `SlotError::InvalidTimeWindow` unless `start < end <= 24:00`.
    pub fn new(start_minutes: u32, end_minutes: u32) -> Result<Self> {
        if start_minutes >= end_minutes || end_minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidTimeWindow {
                start: format_hhmm(start_minutes),
                end: format_hhmm(end_minutes),
            });
        }
        Ok(Self {
            start: start_minutes,
            end: end_minutes,
        })
    }

    /// Parse a pair of `HH:MM` strings. `24:00` is accepted as an end.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    /// The whole day, `00:00` to `24:00`.
    pub fn all_day() -> Self {
        Self {
            start: 0,
            end: MINUTES_PER_DAY,
        }
    }

    pub fn start_minutes(&self) -> u32 {
        self.start
    }

    pub fn end_minutes(&self) -> u32 {
        self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::all_day()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = SlotError;

    fn try_from(raw: RawTimeWindow) -> Result<Self> {
        TimeWindow::parse(&raw.start, &raw.end)
    }
}

impl From<TimeWindow> for RawTimeWindow {
    fn from(w: TimeWindow) -> Self {
        RawTimeWindow {
            start: format_hhmm(w.start),
            end: format_hhmm(w.end),
        }
    }
}

fn parse_hhmm(s: &str) -> Result<u32> {
    let invalid = || SlotError::InvalidTimeWindow {
        start: s.to_string(),
        end: "(unparsed)".to_string(),
    };
    let (hh, mm) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hh.parse().map_err(|_| invalid())?;
    let minutes: u32 = mm.parse().map_err(|_| invalid())?;
    if minutes > 59 || hours * 60 + minutes > MINUTES_PER_DAY {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minutes since midnight, rounded up when the literal carries seconds so a
/// clamped slot never starts before the free time it came from.
fn start_minutes(t: &Timestamp) -> u32 {
    let m = t.minutes_since_midnight();
    if t.is_aligned_to(1) {
        m
    } else {
        m + 1
    }
}

/// Clamp each slot to the daily window, on the slot's own calendar dates and
/// in the slot's own offset.
///
/// A slot that crosses midnight is clamped separately on each date it touches,
/// so one input slot can yield several output slots, one per calendar date.
/// The output can therefore be longer than the input. Parts that clamp to
/// nothing are dropped.
pub fn clamp_to_time_window(slots: &[OfferedSlot], window: &TimeWindow) -> Vec<OfferedSlot> {
    let mut result = Vec::new();

    for slot in slots {
        if slot.interval().is_empty() {
            continue;
        }
        let tz = slot.start().offset();
        let end = if slot.end().offset() == tz {
            *slot.end()
        } else {
            match Timestamp::at_offset(slot.end().instant(), tz) {
                Some(end) => end,
                None => continue,
            }
        };

        let first = slot.start().date();
        let last = end.date();
        let mut date = first;
        loop {
            let day_start = if date == first { start_minutes(slot.start()) } else { 0 };
            let day_end = if date == last {
                end.minutes_since_midnight()
            } else {
                MINUTES_PER_DAY
            };

            let from = day_start.max(window.start);
            let to = day_end.min(window.end);
            if from < to {
                if let (Some(start), Some(stop)) = (
                    Timestamp::from_wall_clock(date, from, tz),
                    Timestamp::from_wall_clock(date, to, tz),
                ) {
                    result.push(OfferedSlot::between(start, stop));
                }
            }

            if date >= last {
                break;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
    }

    debug!(input = slots.len(), output = result.len(), window = %window, "time-of-day filter");
    result
}

/// Cut slots at local midnight so that every piece lies on one calendar date.
///
/// The weekday filter judges a slot by its start date; running this first
/// keeps a free span from Saturday into Monday from passing as a Saturday.
pub fn split_by_date(slots: &[OfferedSlot]) -> Vec<OfferedSlot> {
    clamp_to_time_window(slots, &TimeWindow::all_day())
}

// ── Minimum-duration filter ─────────────────────────────────────────────────

/// Keep slots at least `min_minutes` long. A slot of exactly `min_minutes` stays.
pub fn filter_by_min_duration(slots: &[OfferedSlot], min_minutes: u32) -> Vec<OfferedSlot> {
    slots
        .iter()
        .filter(|slot| slot.duration_minutes() >= i64::from(min_minutes))
        .copied()
        .collect()
}

// ── All-day busy filter ─────────────────────────────────────────────────────

/// Drop busy intervals lasting 24 hours or more.
///
/// Such entries are all-day or multi-day markers (holidays, travel, OOO
/// banners) and do not block availability. Applied to busy input, before gap
/// finding.
pub fn drop_all_day_events(busy: &[BusySlot]) -> Vec<BusySlot> {
    let day = Duration::hours(24);
    let kept: Vec<BusySlot> = busy
        .iter()
        .filter(|b| b.end().instant() - b.start().instant() < day)
        .copied()
        .collect();
    debug!(input = busy.len(), kept = kept.len(), "all-day busy filter");
    kept
}
