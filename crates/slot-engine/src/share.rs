//! Presentation formatters for offered slots.
//!
//! Everything here reads dates and times directly from the timestamp literals,
//! so a slot written as `2026-02-24T10:00:00+09:00` always prints as
//! `2/24(Tue) 10:00`, wherever the code runs.
//!
//! All formats except the voting list merge contiguous slots first.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::contiguous::merge_contiguous_slots;
use crate::error::SlotError;
use crate::interval::OfferedSlot;
use crate::timestamp::Timestamp;

pub const DEFAULT_HEADER: &str = "Available times";
pub const VOTING_HEADER: &str = "Schedule poll";
pub const MAIL_SUBJECT: &str = "Scheduling: available times";

const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Text layouts that need nothing beyond the slots and a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareFormat {
    Text,
    Voting,
    Slack,
    Teams,
}

impl ShareFormat {
    /// Render `slots` in this layout. `header` overrides the default heading;
    /// the voting list always uses its own.
    pub fn render(&self, slots: &[OfferedSlot], header: Option<&str>) -> String {
        match self {
            ShareFormat::Text => format_as_text(slots, header),
            ShareFormat::Voting => format_as_voting(slots),
            ShareFormat::Slack => format_for_slack(slots, header),
            ShareFormat::Teams => format_for_teams(slots, header),
        }
    }
}

impl FromStr for ShareFormat {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, SlotError> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ShareFormat::Text),
            "voting" => Ok(ShareFormat::Voting),
            "slack" => Ok(ShareFormat::Slack),
            "teams" => Ok(ShareFormat::Teams),
            other => Err(SlotError::UnknownFormat(other.to_string())),
        }
    }
}

/// `M/D(Ddd)` for the literal's calendar date, e.g. `2/24(Tue)`.
pub fn format_date_label(t: &Timestamp) -> String {
    let date = t.date();
    format!(
        "{}/{}({})",
        date.month(),
        date.day(),
        DAY_LABELS[date.weekday().num_days_from_sunday() as usize]
    )
}

/// `HH:MM` as written in the literal.
pub fn format_time_label(t: &Timestamp) -> String {
    t.local().format("%H:%M").to_string()
}

/// Group slots by start date, keeping first-appearance order of dates and
/// input order within each date.
pub fn group_slots_by_date(slots: &[OfferedSlot]) -> Vec<(NaiveDate, Vec<OfferedSlot>)> {
    let mut groups: Vec<(NaiveDate, Vec<OfferedSlot>)> = Vec::new();
    for slot in slots {
        let date = slot.start().date();
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, group)) => group.push(*slot),
            None => groups.push((date, vec![*slot])),
        }
    }
    groups
}

/// Shared layout for the grouped formats: heading line, then per date a
/// heading and one line per slot, with a blank line after each block.
fn grouped(
    slots: &[OfferedSlot],
    header: String,
    date_line: impl Fn(&Timestamp) -> String,
    slot_line: impl Fn(&OfferedSlot) -> String,
) -> String {
    let merged = merge_contiguous_slots(slots);
    let mut lines = vec![header, String::new()];
    for (_, day) in group_slots_by_date(&merged) {
        lines.push(date_line(day[0].start()));
        for slot in &day {
            lines.push(slot_line(slot));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn span(slot: &OfferedSlot, separator: &str) -> String {
    format!(
        "{}{}{}",
        format_time_label(slot.start()),
        separator,
        format_time_label(slot.end())
    )
}

/// Plain text, one block per date.
pub fn format_as_text(slots: &[OfferedSlot], header: Option<&str>) -> String {
    grouped(
        slots,
        header.unwrap_or(DEFAULT_HEADER).to_string(),
        |t| format!("■ {}", format_date_label(t)),
        |s| format!("  {}", span(s, " - ")),
    )
}

/// A `mailto:` link whose body is [`format_as_text`].
pub fn format_as_mailto(slots: &[OfferedSlot], recipients: &[&str], header: Option<&str>) -> String {
    let subject = urlencoding::encode(MAIL_SUBJECT);
    let body = urlencoding::encode(&format_as_text(slots, header)).into_owned();
    format!("mailto:{}?subject={}&body={}", recipients.join(","), subject, body)
}

/// One checkbox line per candidate, unmerged, so each can be voted on.
pub fn format_as_voting(slots: &[OfferedSlot]) -> String {
    let mut lines = vec![VOTING_HEADER.to_string(), String::new()];
    for slot in slots {
        lines.push(format!(
            "□ {} {}",
            format_date_label(slot.start()),
            span(slot, "-")
        ));
    }
    lines.join("\n")
}

/// Slack mrkdwn.
pub fn format_for_slack(slots: &[OfferedSlot], header: Option<&str>) -> String {
    grouped(
        slots,
        format!("*{}*", header.unwrap_or(DEFAULT_HEADER)),
        |t| format!("*{}*", format_date_label(t)),
        |s| format!("• {}", span(s, " - ")),
    )
}

/// Microsoft Teams markdown.
pub fn format_for_teams(slots: &[OfferedSlot], header: Option<&str>) -> String {
    grouped(
        slots,
        format!("**{}**", header.unwrap_or(DEFAULT_HEADER)),
        |t| format!("**{}**", format_date_label(t)),
        |s| format!("- {}", span(s, " - ")),
    )
}
