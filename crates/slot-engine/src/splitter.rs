//! Sliding-window splitter: turn variable-length free slots into fixed-length,
//! grid-aligned meeting candidates.
//!
//! For each free slot:
//!
//! 1. If the start is off the 30-minute grid, snap it **up** to the next grid
//!    line (`09:45` → `10:00`, `10:15` → `10:30`).
//! 2. From the snapped start, emit `[cursor, cursor + duration)` while it ends
//!    at or before the slot end, advancing the cursor by one grid step.
//!
//! The fit check runs after snapping, so snapping alone can leave a slot with
//! no candidates. Windows overlap whenever `duration` exceeds the grid step:
//! a 90-minute slot split into 60-minute meetings offers both `:00` and `:30`
//! starts.

use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::OfferedSlot;
use crate::timestamp::Timestamp;

/// Alignment grid and sliding step, in minutes.
pub const SLOT_GRID_MINUTES: u32 = 30;

/// Snap a literal up to the next grid line. Aligned literals are returned as is.
fn snap_up(t: &Timestamp) -> Option<Timestamp> {
    if t.is_aligned_to(SLOT_GRID_MINUTES) {
        return Some(*t);
    }
    let minutes = t.minutes_since_midnight();
    let next_line = (minutes / SLOT_GRID_MINUTES + 1) * SLOT_GRID_MINUTES;
    // from_wall_clock rolls 24:00 over to the next date.
    Timestamp::from_wall_clock(t.date(), next_line, t.offset())
}

/// Split free slots into `duration_minutes`-long windows on the 30-minute grid.
///
/// Each output window is exactly `duration_minutes` long and carries the
/// offset token of the slot it came from.
///
/// # Errors
/// Returns `SlotError::InvalidDuration` if `duration_minutes` is zero.
pub fn split_into_fixed_slots(
    slots: &[OfferedSlot],
    duration_minutes: u32,
) -> Result<Vec<OfferedSlot>> {
    if duration_minutes == 0 {
        return Err(SlotError::InvalidDuration(
            "fixed slot duration must be at least one minute".to_string(),
        ));
    }

    let duration = i64::from(duration_minutes);
    let step = i64::from(SLOT_GRID_MINUTES);
    let mut result = Vec::new();

    for slot in slots {
        let slot_end = slot.end().instant();
        let Some(mut cursor) = snap_up(slot.start()) else {
            continue;
        };

        while let Some(window_end) = cursor.plus_minutes(duration) {
            if window_end.instant() > slot_end {
                break;
            }
            result.push(OfferedSlot::between(cursor, window_end));
            match cursor.plus_minutes(step) {
                Some(next) => cursor = next,
                None => break,
            }
        }
    }

    debug!(
        input = slots.len(),
        windows = result.len(),
        duration_minutes,
        "split into fixed slots"
    );

    Ok(result)
}
