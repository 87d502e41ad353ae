//! Interval value types shared by every pipeline stage.
//!
//! An [`Interval`] can only be built through a checked constructor, so any
//! `Interval` in hand satisfies `start <= end`. [`OfferedSlot`] derives its
//! duration from its own boundaries on every read.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, SlotError};
use crate::timestamp::Timestamp;

/// A span between two timestamp literals, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: Timestamp,
    end: Timestamp,
}

/// Wire shape of an interval before validation.
#[derive(Deserialize)]
struct RawInterval {
    start: Timestamp,
    end: Timestamp,
}

impl TryFrom<RawInterval> for Interval {
    type Error = SlotError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Returns `SlotError::InvalidInterval` when `start` is after `end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start.instant() > end.instant() {
            return Err(SlotError::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Build from boundaries the caller has already ordered.
    pub(crate) fn between(start: Timestamp, end: Timestamp) -> Self {
        debug_assert!(start.instant() <= end.instant());
        Self { start, end }
    }

    /// Parse both boundaries and validate the pair.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    pub fn end(&self) -> &Timestamp {
        &self.end
    }

    /// A zero-length interval. Treated as empty by every stage.
    pub fn is_empty(&self) -> bool {
        self.start.instant() == self.end.instant()
    }

    pub fn duration_minutes(&self) -> i64 {
        self.start.minutes_until(&self.end)
    }

    /// Replace the end boundary, keeping the start literal as is.
    pub(crate) fn with_end(&self, end: Timestamp) -> Self {
        Self::between(self.start, end)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            start: &'a Timestamp,
            end: &'a Timestamp,
        }
        Repr {
            start: &self.start,
            end: &self.end,
        }
        .serialize(serializer)
    }
}

/// A span during which a participant is unavailable.
pub type BusySlot = Interval;

/// A candidate free span offered for scheduling.
///
/// Serializes as `{ start, end, duration_minutes }`. Any duration supplied on
/// input is ignored and recomputed from the boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct OfferedSlot {
    interval: Interval,
}

impl TryFrom<RawInterval> for OfferedSlot {
    type Error = SlotError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end).map(OfferedSlot::from)
    }
}

impl From<Interval> for OfferedSlot {
    fn from(interval: Interval) -> Self {
        Self { interval }
    }
}

impl OfferedSlot {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        Interval::new(start, end).map(Self::from)
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Interval::parse(start, end).map(Self::from)
    }

    pub(crate) fn between(start: Timestamp, end: Timestamp) -> Self {
        Self::from(Interval::between(start, end))
    }

    pub fn start(&self) -> &Timestamp {
        self.interval.start()
    }

    pub fn end(&self) -> &Timestamp {
        self.interval.end()
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Whole minutes between `start` and `end`.
    pub fn duration_minutes(&self) -> i64 {
        self.interval.duration_minutes()
    }
}

impl Serialize for OfferedSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            start: &'a Timestamp,
            end: &'a Timestamp,
            duration_minutes: i64,
        }
        Repr {
            start: self.start(),
            end: self.end(),
            duration_minutes: self.duration_minutes(),
        }
        .serialize(serializer)
    }
}
