//! Merge overlapping or touching offered slots for display.
//!
//! The fixed-slot splitter emits overlapping candidates. When a
//! list is shown to people rather than voted on, `13:00-14:00` and
//! `13:30-14:30` read better as `13:00-14:30`.

use crate::interval::OfferedSlot;

/// Sort by start and merge slots that overlap or touch on the same calendar
/// date. Slots on different dates never merge, even when they meet at midnight.
pub fn merge_contiguous_slots(slots: &[OfferedSlot]) -> Vec<OfferedSlot> {
    let mut sorted: Vec<OfferedSlot> = slots.to_vec();
    sorted.sort_by_key(|s| (s.start().instant(), s.end().instant()));

    let mut merged: Vec<OfferedSlot> = Vec::with_capacity(sorted.len());
    for slot in sorted {
        if let Some(last) = merged.last_mut() {
            let same_day = last.start().date() == slot.start().date();
            if same_day && slot.start().instant() <= last.end().instant() {
                if slot.end().instant() > last.end().instant() {
                    *last = OfferedSlot::between(*last.start(), *slot.end());
                }
                continue;
            }
        }
        merged.push(slot);
    }

    merged
}
