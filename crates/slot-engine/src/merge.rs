//! Collapse overlapping or touching busy intervals.
//!
//! Sorts by start instant, then sweeps once. Touching intervals
//! (`next.start == running.end`) merge. Only the running end is ever
//! extended, and it keeps the literal of the interval that extended it.

use crate::interval::BusySlot;

/// Merge busy intervals into a sorted, non-overlapping, non-touching list.
///
/// Zero-length intervals cover nothing and are dropped. Every boundary in the
/// output is one of the input literals, with its original offset token.
pub fn merge_busy_slots(busy: &[BusySlot]) -> Vec<BusySlot> {
    let mut sorted: Vec<BusySlot> = busy.iter().filter(|b| !b.is_empty()).copied().collect();

    if sorted.is_empty() {
        return Vec::new();
    }

    sorted.sort_by_key(|b| (b.start().instant(), b.end().instant()));

    let mut merged: Vec<BusySlot> = Vec::with_capacity(sorted.len());
    for slot in sorted {
        if let Some(last) = merged.last_mut() {
            if slot.start().instant() <= last.end().instant() {
                if slot.end().instant() > last.end().instant() {
                    *last = last.with_end(*slot.end());
                }
                continue;
            }
        }
        merged.push(slot);
    }

    merged
}
