//! Tests for the full search pipeline and the free/busy source shape.

use slot_engine::{
    find_offered_slots, BusySlot, FreeBusyResponse, HolidayCalendar, OfferedSlot, SearchRequest,
    SlotError, SlotShape, TimeWindow, WeekdaySet,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn busy(start: &str, end: &str) -> BusySlot {
    BusySlot::parse(start, end).unwrap()
}

fn request(start: &str, end: &str) -> SearchRequest {
    SearchRequest::new(start.parse().unwrap(), end.parse().unwrap())
}

fn literals(slots: &[OfferedSlot]) -> Vec<(String, String)> {
    slots
        .iter()
        .map(|s| (s.start().to_string(), s.end().to_string()))
        .collect()
}

fn three_people() -> Vec<BusySlot> {
    vec![
        // Person A
        busy("2026-02-24T09:00:00+09:00", "2026-02-24T10:00:00+09:00"),
        busy("2026-02-24T14:00:00+09:00", "2026-02-24T15:00:00+09:00"),
        // Person B
        busy("2026-02-24T10:00:00+09:00", "2026-02-24T11:30:00+09:00"),
        busy("2026-02-24T16:00:00+09:00", "2026-02-24T17:00:00+09:00"),
        // Person C
        busy("2026-02-24T09:30:00+09:00", "2026-02-24T10:30:00+09:00"),
        busy("2026-02-24T13:00:00+09:00", "2026-02-24T14:00:00+09:00"),
    ]
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn three_calendars_weekday_business_hours() {
    let mut req = request("2026-02-24T09:00:00+09:00", "2026-02-24T18:00:00+09:00");
    req.weekdays = WeekdaySet::WEEKDAYS;
    req.time_window = TimeWindow::parse("09:00", "18:00").unwrap();
    req.shape = SlotShape::Free { min_minutes: 30 };

    let outcome = find_offered_slots(&three_people(), &req, &HolidayCalendar::new()).unwrap();

    // Merged busy: 09:00-11:30, 13:00-15:00, 16:00-17:00
    assert_eq!(
        literals(&outcome.slots),
        vec![
            ("2026-02-24T11:30:00+09:00".into(), "2026-02-24T13:00:00+09:00".into()),
            ("2026-02-24T15:00:00+09:00".into(), "2026-02-24T16:00:00+09:00".into()),
            ("2026-02-24T17:00:00+09:00".into(), "2026-02-24T18:00:00+09:00".into()),
        ]
    );
    assert!(outcome.excluded_holidays.is_empty());
}

#[test]
fn three_calendars_fixed_sixty_minute_slots() {
    let mut req = request("2026-02-24T09:00:00+09:00", "2026-02-24T18:00:00+09:00");
    req.shape = SlotShape::Fixed { minutes: 60 };

    let outcome = find_offered_slots(&three_people(), &req, &HolidayCalendar::new()).unwrap();

    assert_eq!(
        literals(&outcome.slots),
        vec![
            ("2026-02-24T11:30:00+09:00".into(), "2026-02-24T12:30:00+09:00".into()),
            ("2026-02-24T12:00:00+09:00".into(), "2026-02-24T13:00:00+09:00".into()),
            ("2026-02-24T15:00:00+09:00".into(), "2026-02-24T16:00:00+09:00".into()),
            ("2026-02-24T17:00:00+09:00".into(), "2026-02-24T18:00:00+09:00".into()),
        ]
    );
}

#[test]
fn sunday_is_excluded_on_weekdays_only() {
    let mut req = request("2026-02-22T09:00:00+09:00", "2026-02-22T18:00:00+09:00");
    req.weekdays = WeekdaySet::WEEKDAYS;

    let outcome = find_offered_slots(&[], &req, &HolidayCalendar::new()).unwrap();
    assert!(outcome.slots.is_empty());
}

#[test]
fn weekend_spanning_gap_keeps_only_allowed_dates() {
    // Free from Friday evening until Monday noon; weekdays only.
    let busy = vec![
        busy("2026-02-20T09:00:00+09:00", "2026-02-20T17:00:00+09:00"),
        busy("2026-02-23T12:00:00+09:00", "2026-02-23T18:00:00+09:00"),
    ];
    let mut req = request("2026-02-20T09:00:00+09:00", "2026-02-23T18:00:00+09:00");
    req.weekdays = WeekdaySet::WEEKDAYS;
    req.time_window = TimeWindow::parse("09:00", "18:00").unwrap();
    req.shape = SlotShape::Free { min_minutes: 0 };

    let outcome = find_offered_slots(&busy, &req, &HolidayCalendar::new()).unwrap();

    assert_eq!(
        literals(&outcome.slots),
        vec![
            ("2026-02-20T17:00:00+09:00".into(), "2026-02-20T18:00:00+09:00".into()),
            ("2026-02-23T09:00:00+09:00".into(), "2026-02-23T12:00:00+09:00".into()),
        ]
    );
}

#[test]
fn short_gaps_are_dropped_in_free_mode() {
    let busy = vec![
        busy("2026-02-24T09:00:00+09:00", "2026-02-24T09:50:00+09:00"),
        busy("2026-02-24T10:00:00+09:00", "2026-02-24T18:00:00+09:00"),
    ];
    let mut req = request("2026-02-24T09:00:00+09:00", "2026-02-24T18:00:00+09:00");
    req.shape = SlotShape::Free { min_minutes: 30 };

    let outcome = find_offered_slots(&busy, &req, &HolidayCalendar::new()).unwrap();
    assert!(outcome.slots.is_empty());
}

#[test]
fn multi_day_search_with_daily_window() {
    let mut req = request("2026-02-24T00:00:00+09:00", "2026-02-26T23:59:59+09:00");
    req.time_window = TimeWindow::parse("09:00", "12:00").unwrap();
    req.shape = SlotShape::Fixed { minutes: 180 };

    let outcome = find_offered_slots(&[], &req, &HolidayCalendar::new()).unwrap();

    assert_eq!(
        literals(&outcome.slots),
        vec![
            ("2026-02-24T09:00:00+09:00".into(), "2026-02-24T12:00:00+09:00".into()),
            ("2026-02-25T09:00:00+09:00".into(), "2026-02-25T12:00:00+09:00".into()),
            ("2026-02-26T09:00:00+09:00".into(), "2026-02-26T12:00:00+09:00".into()),
        ]
    );
}

#[test]
fn all_day_events_block_unless_excluded() {
    let busy = vec![busy("2026-02-24T00:00:00+09:00", "2026-02-25T00:00:00+09:00")];
    let mut req = request("2026-02-24T09:00:00+09:00", "2026-02-24T18:00:00+09:00");
    req.shape = SlotShape::Free { min_minutes: 0 };

    let blocked = find_offered_slots(&busy, &req, &HolidayCalendar::new()).unwrap();
    assert!(blocked.slots.is_empty());

    req.exclude_all_day_events = true;
    let open = find_offered_slots(&busy, &req, &HolidayCalendar::new()).unwrap();
    assert_eq!(open.slots.len(), 1);
    assert_eq!(open.slots[0].duration_minutes(), 540);
}

#[test]
fn holidays_are_excluded_and_reported_when_requested() {
    let holidays = HolidayCalendar::from_entries([("2026-02-11", "National Foundation Day")]).unwrap();
    let mut req = request("2026-02-10T09:00:00+09:00", "2026-02-12T18:00:00+09:00");
    req.time_window = TimeWindow::parse("10:00", "11:00").unwrap();

    let kept = find_offered_slots(&[], &req, &holidays).unwrap();
    assert_eq!(kept.slots.len(), 3);
    assert!(kept.excluded_holidays.is_empty());

    req.exclude_holidays = true;
    let outcome = find_offered_slots(&[], &req, &holidays).unwrap();
    assert_eq!(outcome.slots.len(), 2);
    assert_eq!(outcome.excluded_holidays.len(), 1);
    assert_eq!(outcome.excluded_holidays[0].name, "National Foundation Day");
}

#[test]
fn inverted_range_fails_before_any_stage() {
    let req = request("2026-02-24T18:00:00+09:00", "2026-02-24T09:00:00+09:00");
    let err = find_offered_slots(&[], &req, &HolidayCalendar::new()).unwrap_err();
    assert!(matches!(err, SlotError::InvalidDateRange { .. }));
}

#[test]
fn zero_fixed_duration_is_rejected() {
    let mut req = request("2026-02-24T09:00:00+09:00", "2026-02-24T18:00:00+09:00");
    req.shape = SlotShape::Fixed { minutes: 0 };
    let err = find_offered_slots(&[], &req, &HolidayCalendar::new()).unwrap_err();
    assert!(matches!(err, SlotError::InvalidDuration(_)));
}

#[test]
fn identical_requests_produce_identical_json() {
    let mut req = request("2026-02-24T09:00:00+09:00", "2026-02-27T18:00:00+09:00");
    req.time_window = TimeWindow::parse("09:00", "18:00").unwrap();

    let a = find_offered_slots(&three_people(), &req, &HolidayCalendar::new()).unwrap();
    let b = find_offered_slots(&three_people(), &req, &HolidayCalendar::new()).unwrap();

    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn request_deserializes_with_defaults() {
    let json = r#"{
        "range_start": "2026-02-24T09:00:00+09:00",
        "range_end": "2026-02-24T18:00:00+09:00",
        "weekdays": [1, 2, 3, 4, 5],
        "shape": { "mode": "fixed", "minutes": 30 }
    }"#;

    let req: SearchRequest = serde_json::from_str(json).unwrap();

    assert_eq!(req.weekdays, WeekdaySet::WEEKDAYS);
    assert_eq!(req.time_window, TimeWindow::all_day());
    assert_eq!(req.shape, SlotShape::Fixed { minutes: 30 });
    assert!(!req.exclude_all_day_events);
    assert!(!req.exclude_holidays);
}

#[test]
fn offered_slot_serializes_duration() {
    let slot = OfferedSlot::parse("2026-02-24T09:00:00+09:00", "2026-02-24T10:30:00+09:00").unwrap();
    let json = serde_json::to_value(slot).unwrap();
    assert_eq!(json["start"], "2026-02-24T09:00:00+09:00");
    assert_eq!(json["end"], "2026-02-24T10:30:00+09:00");
    assert_eq!(json["duration_minutes"], 90);
}

// ── Free/busy source ────────────────────────────────────────────────────────

const RESPONSE: &str = r#"{
    "calendars": {
        "alice@example.com": {
            "busy": [
                { "start": "2026-02-24T09:00:00+09:00", "end": "2026-02-24T10:00:00+09:00" }
            ]
        },
        "bob@example.com": {
            "busy": [],
            "errors": [ { "domain": "global", "reason": "notFound" } ]
        },
        "carol@example.com": {
            "busy": [
                { "start": "2026-02-24T01:00:00Z", "end": "2026-02-24T02:00:00Z" }
            ]
        }
    }
}"#;

#[test]
fn source_flattens_busy_across_calendars() {
    let response: FreeBusyResponse = serde_json::from_str(RESPONSE).unwrap();

    assert_eq!(response.all_busy().len(), 2);
    assert_eq!(response.failed_calendars(), vec!["bob@example.com"]);
}

#[test]
fn failed_calendar_does_not_stop_the_search() {
    let response: FreeBusyResponse = serde_json::from_str(RESPONSE).unwrap();
    let mut req = request("2026-02-24T09:00:00+09:00", "2026-02-24T12:00:00+09:00");
    req.shape = SlotShape::Free { min_minutes: 0 };

    let outcome = find_offered_slots(&response.all_busy(), &req, &HolidayCalendar::new()).unwrap();

    // Alice 09:00-10:00 and Carol 10:00-11:00 (JST) merge into one block.
    assert_eq!(
        literals(&outcome.slots),
        vec![("2026-02-24T11:00:00+09:00".into(), "2026-02-24T12:00:00+09:00".into())]
    );
}

#[test]
fn source_without_calendars_key_is_rejected() {
    let json = r#"{
        "calendar": {
            "alice@example.com": {
                "busy": [ { "start": "2026-02-24T09:00:00Z", "end": "2026-02-24T10:00:00Z" } ]
            }
        }
    }"#;
    assert!(serde_json::from_str::<FreeBusyResponse>(json).is_err());
}

#[test]
fn calendar_entry_with_misspelled_busy_is_rejected() {
    let json = r#"{
        "calendars": {
            "alice@example.com": {
                "bussy": [ { "start": "2026-02-24T09:00:00Z", "end": "2026-02-24T10:00:00Z" } ]
            }
        }
    }"#;
    let err = serde_json::from_str::<FreeBusyResponse>(json).unwrap_err();
    assert!(err.to_string().contains("neither `busy` nor `errors`"), "{}", err);
}

#[test]
fn failed_calendar_may_omit_busy() {
    let json = r#"{
        "kind": "calendar#freeBusy",
        "timeMin": "2026-02-24T00:00:00Z",
        "calendars": {
            "bob@example.com": {
                "errors": [ { "domain": "global", "reason": "notFound" } ]
            }
        }
    }"#;
    let response: FreeBusyResponse = serde_json::from_str(json).unwrap();

    assert!(response.all_busy().is_empty());
    assert_eq!(response.failed_calendars(), vec!["bob@example.com"]);
}
