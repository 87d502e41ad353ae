//! Derive free intervals from busy intervals inside a bounding range.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::{BusySlot, OfferedSlot};
use crate::merge::merge_busy_slots;
use crate::timestamp::Timestamp;

/// Find every sub-interval of `[range_start, range_end)` not covered by busy time.
///
/// Busy intervals are merged first. Output literals are written in the offset
/// of `range_start`, whatever offsets the busy input used. A range fully
/// covered by busy time yields an empty list. With no busy input the whole
/// range comes back as one slot.
///
/// # Errors
/// Returns `SlotError::InvalidDateRange` if `range_start` is after `range_end`.
pub fn find_available_slots(
    busy: &[BusySlot],
    range_start: &Timestamp,
    range_end: &Timestamp,
) -> Result<Vec<OfferedSlot>> {
    if range_start.instant() > range_end.instant() {
        return Err(SlotError::InvalidDateRange {
            start: range_start.to_string(),
            end: range_end.to_string(),
        });
    }

    let tz = range_start.offset();
    let end = range_end.instant();
    let merged = merge_busy_slots(busy);

    let gap = |from: DateTime<Utc>, to: DateTime<Utc>| {
        Some(OfferedSlot::between(
            Timestamp::at_offset(from, tz)?,
            Timestamp::at_offset(to, tz)?,
        ))
    };

    let mut available = Vec::new();
    let mut cursor = range_start.instant();

    for slot in &merged {
        let busy_start = slot.start().instant();
        let busy_end = slot.end().instant();

        if busy_end <= cursor {
            continue;
        }
        if busy_start >= end {
            break;
        }

        let gap_end = busy_start.min(end);
        if gap_end > cursor {
            available.extend(gap(cursor, gap_end));
        }
        cursor = cursor.max(busy_end);
    }

    // Trailing free time after the last busy interval.
    if cursor < end {
        available.extend(gap(cursor, end));
    }

    debug!(
        busy = busy.len(),
        merged = merged.len(),
        free = available.len(),
        "computed free slots"
    );

    Ok(available)
}
