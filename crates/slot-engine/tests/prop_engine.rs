//! Property-based tests for the engine using proptest.
//!
//! Busy intervals are generated on a one-minute lattice over two days, with
//! boundaries written in a mix of offsets, so coverage can be compared
//! minute by minute.

use proptest::prelude::*;
use slot_engine::{
    find_available_slots, find_offered_slots, merge_busy_slots, split_into_fixed_slots, BusySlot,
    HolidayCalendar, Interval, OfferedSlot, SearchRequest, SlotShape, Timestamp, TimeWindow,
    UtcOffset, SLOT_GRID_MINUTES,
};

const HORIZON: i64 = 2 * 1440;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> Timestamp {
    "2026-02-24T00:00:00+09:00".parse().unwrap()
}

fn arb_offset() -> impl Strategy<Value = UtcOffset> {
    prop_oneof![
        Just(UtcOffset::Minutes(9 * 60)),
        Just(UtcOffset::Zulu),
        Just(UtcOffset::Minutes(-5 * 60)),
        Just(UtcOffset::Minutes(5 * 60 + 30)),
    ]
}

/// A busy interval somewhere in the horizon, possibly empty, possibly
/// hanging over either edge.
fn arb_busy() -> impl Strategy<Value = BusySlot> {
    (-120i64..HORIZON, 0i64..=300, arb_offset(), arb_offset()).prop_map(|(start, len, a, b)| {
        let s = base().plus_minutes(start).unwrap();
        let e = base().plus_minutes(start + len).unwrap();
        Interval::new(
            Timestamp::at_offset(s.instant(), a).unwrap(),
            Timestamp::at_offset(e.instant(), b).unwrap(),
        )
        .unwrap()
    })
}

fn arb_busy_list() -> impl Strategy<Value = Vec<BusySlot>> {
    prop::collection::vec(arb_busy(), 0..20)
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn minute_of(t: &Timestamp) -> i64 {
    (t.instant() - base().instant()).num_minutes()
}

/// Minutes in `[from, to)` covered by any interval.
fn coverage(intervals: &[Interval], from: i64, to: i64) -> Vec<bool> {
    let mut covered = vec![false; (to - from) as usize];
    for iv in intervals {
        let s = minute_of(iv.start()).max(from);
        let e = minute_of(iv.end()).min(to);
        for m in s..e.max(s) {
            covered[(m - from) as usize] = true;
        }
    }
    covered
}

fn slot_intervals(slots: &[OfferedSlot]) -> Vec<Interval> {
    slots.iter().map(|s| *s.interval()).collect()
}

// ---------------------------------------------------------------------------
// Property 1: Merging twice changes nothing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn merge_is_idempotent(busy in arb_busy_list()) {
        let once = merge_busy_slots(&busy);
        let twice = merge_busy_slots(&once);
        prop_assert_eq!(once, twice);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Merged output is sorted, disjoint and non-touching
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn merged_intervals_are_separated(busy in arb_busy_list()) {
        let merged = merge_busy_slots(&busy);
        for pair in merged.windows(2) {
            prop_assert!(
                pair[0].end().instant() < pair[1].start().instant(),
                "not separated: {:?} / {:?}",
                pair[0],
                pair[1]
            );
        }
        for iv in &merged {
            prop_assert!(!iv.is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Merging covers exactly the same minutes
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn merge_preserves_coverage(busy in arb_busy_list()) {
        let merged = merge_busy_slots(&busy);
        prop_assert_eq!(
            coverage(&busy, -120, HORIZON + 300),
            coverage(&merged, -120, HORIZON + 300)
        );
    }
}

// ---------------------------------------------------------------------------
// Property 4: Free and busy partition the range
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn gaps_complement_busy(busy in arb_busy_list(), end in 1i64..=HORIZON) {
        let range_start = base();
        let range_end = base().plus_minutes(end).unwrap();

        let free = find_available_slots(&busy, &range_start, &range_end).unwrap();

        let busy_cover = coverage(&busy, 0, end);
        let free_cover = coverage(&slot_intervals(&free), 0, end);
        for m in 0..end as usize {
            prop_assert!(
                busy_cover[m] != free_cover[m],
                "minute {} is busy={} free={}",
                m,
                busy_cover[m],
                free_cover[m]
            );
        }
        for slot in &free {
            prop_assert_eq!(slot.start().offset(), range_start.offset());
            prop_assert_eq!(slot.end().offset(), range_start.offset());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Duration always matches the literals
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn duration_matches_boundaries(busy in arb_busy_list()) {
        let range_end = base().plus_minutes(HORIZON).unwrap();
        let free = find_available_slots(&busy, &base(), &range_end).unwrap();
        for slot in &free {
            prop_assert!(slot.duration_minutes() > 0);
            prop_assert_eq!(slot.duration_minutes(), slot.start().minutes_until(slot.end()));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Split windows are exact, aligned and contained
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn split_windows_fit_their_source(busy in arb_busy_list(), minutes in 15u32..=180) {
        let range_end = base().plus_minutes(HORIZON).unwrap();
        let free = find_available_slots(&busy, &base(), &range_end).unwrap();
        let windows = split_into_fixed_slots(&free, minutes).unwrap();

        for w in &windows {
            prop_assert_eq!(w.duration_minutes(), i64::from(minutes));
            prop_assert!(w.start().is_aligned_to(SLOT_GRID_MINUTES));
            prop_assert!(
                free.iter().any(|f| f.start().instant() <= w.start().instant()
                    && w.end().instant() <= f.end().instant()),
                "window {:?} escapes every free slot",
                w
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Same request, same bytes
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn pipeline_is_deterministic(
        busy in arb_busy_list(),
        window_start in 0u32..12,
        minutes in 30u32..=120,
    ) {
        let mut request = SearchRequest::new(base(), base().plus_minutes(HORIZON).unwrap());
        request.time_window = TimeWindow::new(window_start * 60, (window_start + 8) * 60).unwrap();
        request.shape = SlotShape::Fixed { minutes };

        let holidays = HolidayCalendar::new();
        let a = find_offered_slots(&busy, &request, &holidays).unwrap();
        let b = find_offered_slots(&busy, &request, &holidays).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
