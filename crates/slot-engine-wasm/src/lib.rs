//! WASM bindings for slot-engine.
//!
//! Exposes the availability search, its building blocks and the share
//! formatters to JavaScript via `wasm-bindgen`. All complex values cross the
//! boundary as JSON strings; timestamps stay literal strings with their own
//! offsets, so the browser's timezone never enters the computation.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use serde::Deserialize;
use slot_engine::share::format_as_mailto;
use slot_engine::{
    BusySlot, FreeBusyResponse, HolidayCalendar, OfferedSlot, SearchRequest, ShareFormat,
    Timestamp,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Input shapes
// ---------------------------------------------------------------------------

/// Busy data as either a bare `[{start, end}]` array or a full free/busy
/// response keyed by calendar id.
#[derive(Deserialize)]
#[serde(untagged)]
enum BusyInput {
    Bare(Vec<BusySlot>),
    Response(FreeBusyResponse),
}

/// Slots as a bare array or as a search result carrying `slots`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SlotsInput {
    Bare(Vec<OfferedSlot>),
    Outcome { slots: Vec<OfferedSlot> },
}

fn parse_busy(json: &str) -> Result<Vec<BusySlot>, String> {
    let input: BusyInput =
        serde_json::from_str(json).map_err(|e| format!("Invalid busy JSON: {}", e))?;
    Ok(match input {
        BusyInput::Bare(busy) => busy,
        BusyInput::Response(response) => response.all_busy(),
    })
}

fn parse_slots(json: &str) -> Result<Vec<OfferedSlot>, String> {
    let input: SlotsInput =
        serde_json::from_str(json).map_err(|e| format!("Invalid slots JSON: {}", e))?;
    Ok(match input {
        SlotsInput::Bare(slots) | SlotsInput::Outcome { slots } => slots,
    })
}

fn parse_timestamp(s: &str) -> Result<Timestamp, String> {
    s.parse().map_err(|e: slot_engine::SlotError| e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Core logic, kept free of `JsValue` so it runs on native targets too
// ---------------------------------------------------------------------------

fn merge_busy(busy_json: &str) -> Result<String, String> {
    to_json(&slot_engine::merge_busy_slots(&parse_busy(busy_json)?))
}

fn available(busy_json: &str, range_start: &str, range_end: &str) -> Result<String, String> {
    let busy = parse_busy(busy_json)?;
    let slots = slot_engine::find_available_slots(
        &busy,
        &parse_timestamp(range_start)?,
        &parse_timestamp(range_end)?,
    )
    .map_err(|e| e.to_string())?;
    to_json(&slots)
}

fn offered(
    busy_json: &str,
    request_json: &str,
    holidays_json: Option<&str>,
) -> Result<String, String> {
    let busy = parse_busy(busy_json)?;
    let request: SearchRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;
    let holidays: HolidayCalendar = match holidays_json {
        Some(json) => {
            serde_json::from_str(json).map_err(|e| format!("Invalid holidays JSON: {}", e))?
        }
        None => HolidayCalendar::new(),
    };

    let outcome =
        slot_engine::find_offered_slots(&busy, &request, &holidays).map_err(|e| e.to_string())?;
    to_json(&outcome)
}

fn merge_contiguous(slots_json: &str) -> Result<String, String> {
    to_json(&slot_engine::merge_contiguous_slots(&parse_slots(slots_json)?))
}

fn render_slots(slots_json: &str, format_name: &str, header: Option<&str>) -> Result<String, String> {
    let slots = parse_slots(slots_json)?;
    let format: ShareFormat = format_name.parse().map_err(|e: slot_engine::SlotError| e.to_string())?;
    Ok(format.render(&slots, header))
}

fn mailto(slots_json: &str, recipients: &str, header: Option<&str>) -> Result<String, String> {
    let slots = parse_slots(slots_json)?;
    let recipients: Vec<&str> = recipients
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .collect();
    Ok(format_as_mailto(&slots, &recipients, header))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Merge overlapping or touching busy intervals.
///
/// `busy_json` is a `[{start, end}]` array or a free/busy response object.
/// Returns a JSON array of `{start, end}`.
#[wasm_bindgen(js_name = "mergeBusySlots")]
pub fn merge_busy_slots(busy_json: &str) -> Result<String, JsValue> {
    merge_busy(busy_json).map_err(js_err)
}

/// Free intervals in `[range_start, range_end)` given busy data.
///
/// Returns a JSON array of `{start, end, duration_minutes}` written in the
/// offset of `range_start`.
#[wasm_bindgen(js_name = "findAvailableSlots")]
pub fn find_available_slots(
    busy_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, JsValue> {
    available(busy_json, range_start, range_end).map_err(js_err)
}

/// Run the full search.
///
/// # Arguments
/// - `busy_json` -- busy intervals, bare array or free/busy response
/// - `request_json` -- `{range_start, range_end, weekdays?, time_window?, shape?,
///   exclude_all_day_events?, exclude_holidays?}`
/// - `holidays_json` -- optional `{"YYYY-MM-DD": "name"}` table
///
/// Returns `{slots, excluded_holidays}` as JSON.
#[wasm_bindgen(js_name = "findOfferedSlots")]
pub fn find_offered_slots(
    busy_json: &str,
    request_json: &str,
    holidays_json: Option<String>,
) -> Result<String, JsValue> {
    offered(busy_json, request_json, holidays_json.as_deref()).map_err(js_err)
}

/// Merge offered slots that overlap or touch on the same date.
#[wasm_bindgen(js_name = "mergeContiguousSlots")]
pub fn merge_contiguous_slots(slots_json: &str) -> Result<String, JsValue> {
    merge_contiguous(slots_json).map_err(js_err)
}

/// Render slots as `text`, `voting`, `slack` or `teams`.
#[wasm_bindgen(js_name = "formatSlots")]
pub fn format_slots(
    slots_json: &str,
    format_name: &str,
    header: Option<String>,
) -> Result<String, JsValue> {
    render_slots(slots_json, format_name, header.as_deref()).map_err(js_err)
}

/// Build a `mailto:` link. `recipients` is a comma-separated address list.
#[wasm_bindgen(js_name = "formatMailto")]
pub fn format_mailto(
    slots_json: &str,
    recipients: &str,
    header: Option<String>,
) -> Result<String, JsValue> {
    mailto(slots_json, recipients, header.as_deref()).map_err(js_err)
}
