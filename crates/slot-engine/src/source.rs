//! Response shape of a free/busy source.
//!
//! A source answers one query with a map of calendar id to that calendar's
//! busy intervals. A calendar it could not read carries `errors` instead; its
//! busy time is simply missing from the result and the search goes on.
//!
//! Parsing is strict about shape: `calendars` is required, and each entry
//! must carry `busy`, `errors`, or both. Unknown fields elsewhere (`kind`,
//! `timeMin`) are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SlotError};
use crate::interval::BusySlot;

/// Why a source could not read one calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarError {
    pub domain: String,
    pub reason: String,
}

/// Busy data for one calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCalendarBusy")]
pub struct CalendarBusy {
    pub busy: Vec<BusySlot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CalendarError>,
}

#[derive(Deserialize)]
struct RawCalendarBusy {
    busy: Option<Vec<BusySlot>>,
    #[serde(default)]
    errors: Vec<CalendarError>,
}

impl TryFrom<RawCalendarBusy> for CalendarBusy {
    type Error = SlotError;

    fn try_from(raw: RawCalendarBusy) -> Result<Self> {
        // A failed calendar may omit `busy`; anything else without it is a
        // misspelled or foreign payload.
        match (raw.busy, raw.errors.is_empty()) {
            (Some(busy), _) => Ok(Self { busy, errors: raw.errors }),
            (None, false) => Ok(Self { busy: Vec::new(), errors: raw.errors }),
            (None, true) => Err(SlotError::InvalidFreeBusy(
                "calendar entry has neither `busy` nor `errors`".to_string(),
            )),
        }
    }
}

/// One free/busy answer covering any number of calendars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBusyResponse {
    pub calendars: BTreeMap<String, CalendarBusy>,
}

impl FreeBusyResponse {
    /// Every busy interval from every calendar, in calendar-id order.
    ///
    /// Calendars that reported errors still contribute whatever busy data they
    /// returned; a warning is logged for each.
    pub fn all_busy(&self) -> Vec<BusySlot> {
        for (id, calendar) in &self.calendars {
            if !calendar.errors.is_empty() {
                let reasons: Vec<&str> = calendar.errors.iter().map(|e| e.reason.as_str()).collect();
                warn!(calendar = %id, reasons = ?reasons, "calendar busy data unavailable");
            }
        }
        self.calendars
            .values()
            .flat_map(|c| c.busy.iter().copied())
            .collect()
    }

    /// Ids of calendars that reported errors.
    pub fn failed_calendars(&self) -> Vec<&str> {
        self.calendars
            .iter()
            .filter(|(_, c)| !c.errors.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
