//! Timestamp literals: a wall-clock date and time paired with the explicit
//! UTC offset token it was written with.
//!
//! The engine never asks the host for a timezone. Every wall-clock value is
//! read directly from the literal, and every derived literal is written back
//! with an offset token carried explicitly through the call chain. Comparisons
//! between literals go through [`Timestamp::instant`], which applies only the
//! literal's own offset.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SlotError};

pub(crate) const MINUTES_PER_DAY: u32 = 24 * 60;

/// The offset token of a timestamp literal: `Z` or `±HH:MM`.
///
/// `Z` and `+00:00` describe the same offset but are kept distinct so that a
/// request written in `Z` produces results written in `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtcOffset {
    Zulu,
    /// Minutes east of UTC.
    Minutes(i32),
}

impl UtcOffset {
    /// Offset from UTC in minutes (east positive).
    pub fn minutes(&self) -> i32 {
        match self {
            UtcOffset::Zulu => 0,
            UtcOffset::Minutes(m) => *m,
        }
    }

    /// Pull the offset token off the end of a timestamp literal, if it has one.
    ///
    /// Returns the offset and the byte index where the token begins.
    pub fn extract(literal: &str) -> Option<(UtcOffset, usize)> {
        if let Some(stripped) = literal.strip_suffix(['Z', 'z']) {
            return Some((UtcOffset::Zulu, stripped.len()));
        }
        // The date part contains '-' too, so only look after the 'T'.
        let time_start = literal.find(['T', 't', ' '])?;
        let sign_at = literal[time_start..].rfind(['+', '-'])? + time_start;
        let offset = literal[sign_at..].parse().ok()?;
        Some((offset, sign_at))
    }
}

impl FromStr for UtcOffset {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "Z" || s == "z" {
            return Ok(UtcOffset::Zulu);
        }
        let invalid = || SlotError::InvalidTimestamp(format!("bad UTC offset '{}'", s));

        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(invalid()),
        };
        if !rest.is_ascii() {
            return Err(invalid());
        }
        // Only the colon form, so the token is written back exactly as read.
        if rest.len() != 5 || rest.as_bytes()[2] != b':' {
            return Err(invalid());
        }
        let (hh, mm) = (&rest[..2], &rest[3..]);
        let hours: i32 = hh.parse().map_err(|_| invalid())?;
        let minutes: i32 = mm.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }
        Ok(UtcOffset::Minutes(sign * (hours * 60 + minutes)))
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtcOffset::Zulu => f.write_str("Z"),
            UtcOffset::Minutes(m) => {
                let sign = if *m < 0 { '-' } else { '+' };
                let abs = m.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

/// A timestamp literal such as `2026-02-24T09:00:00+09:00`.
///
/// Equality is literal equality: the same instant written with two different
/// offsets compares unequal. Use [`Timestamp::instant`] to order literals.
///
/// Every constructor checks that the literal's instant is representable, so
/// [`Timestamp::instant`] cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: UtcOffset,
    // `local` minus `offset`; derived, so equality stays literal equality.
    utc: NaiveDateTime,
}

fn offset_delta(offset: UtcOffset) -> Duration {
    Duration::minutes(i64::from(offset.minutes()))
}

impl Timestamp {
    fn checked(local: NaiveDateTime, offset: UtcOffset) -> Option<Self> {
        let utc = local.checked_sub_signed(offset_delta(offset))?;
        Some(Self { local, offset, utc })
    }

    /// # Errors
    /// Returns `SlotError::InvalidTimestamp` if the wall clock shifted by the
    /// offset falls outside the supported date range.
    pub fn new(local: NaiveDateTime, offset: UtcOffset) -> Result<Self> {
        Self::checked(local, offset).ok_or_else(|| {
            SlotError::InvalidTimestamp(format!(
                "'{}{}' is outside the supported date range",
                local.format("%Y-%m-%dT%H:%M:%S"),
                offset
            ))
        })
    }

    /// Build a literal from a calendar date and minutes since local midnight.
    ///
    /// `minutes` may be `1440`, which lands on midnight of the following day.
    /// `None` at the edge of the supported date range.
    pub fn from_wall_clock(date: NaiveDate, minutes: u32, offset: UtcOffset) -> Option<Self> {
        let local = date
            .and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::minutes(i64::from(minutes)))?;
        Self::checked(local, offset)
    }

    /// Write `instant` as a wall-clock literal in the given offset.
    /// `None` at the edge of the supported date range.
    pub fn at_offset(instant: DateTime<Utc>, offset: UtcOffset) -> Option<Self> {
        let utc = instant.naive_utc();
        let local = utc.checked_add_signed(offset_delta(offset))?;
        Some(Self { local, offset, utc })
    }

    /// The absolute instant this literal denotes.
    pub fn instant(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.utc)
    }

    /// The wall-clock date and time, exactly as written.
    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// The calendar date as written in the literal.
    pub fn date(&self) -> NaiveDate {
        self.local.date()
    }

    /// Minutes since local midnight, ignoring seconds.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.local.hour() * 60 + self.local.minute()
    }

    /// True when the wall clock sits exactly on a multiple of `grid_minutes`.
    pub fn is_aligned_to(&self, grid_minutes: u32) -> bool {
        self.local.second() == 0
            && self.local.nanosecond() == 0
            && self.minutes_since_midnight() % grid_minutes == 0
    }

    /// Shift by whole minutes, keeping the same offset token.
    /// `None` when the result leaves the supported date range.
    pub fn plus_minutes(&self, minutes: i64) -> Option<Self> {
        let local = self.local.checked_add_signed(Duration::try_minutes(minutes)?)?;
        Self::checked(local, self.offset)
    }

    /// Whole minutes from `self` to `other` (negative if `other` is earlier).
    pub fn minutes_until(&self, other: &Timestamp) -> i64 {
        (other.instant() - self.instant()).num_minutes()
    }
}

impl FromStr for Timestamp {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (offset, at) = UtcOffset::extract(s).ok_or_else(|| {
            SlotError::InvalidTimestamp(format!("'{}' has no explicit UTC offset", s))
        })?;
        let body = &s[..at];
        let local = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M"))
            .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|e| SlotError::InvalidTimestamp(format!("'{}': {}", s, e)))?;
        Self::new(local, offset)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.local.format("%Y-%m-%dT%H:%M:%S"), self.offset)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
