//! Time window model.
//!
//! A window is the basic temporal unit of planning: resource availability,
//! the planning horizon, recurrence projections and placed items are all
//! windows.
//!
//! # Time Model
//! Instants are wall-clock `NaiveDateTime` values; the consumer defines the
//! zone. Windows are half-open intervals `[start, end)`.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end. A window whose end
/// precedes its start is malformed and rejected by validation.
///
/// Serialized as `{ "start": ..., "duration": <seconds> }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "WindowRepr", try_from = "WindowRepr")]
pub struct Window {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl Window {
    /// Creates a window from a start instant and a duration.
    pub fn new(start: NaiveDateTime, duration: TimeDelta) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Creates a window from its bounds.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether the window has no length (or negative length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether an instant falls within this window.
    #[inline]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Whether two windows overlap. Touching windows do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely inside this window.
    pub fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Common part of two windows, `None` when it would be empty.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Parts of this window not covered by `other` (zero, one or two pieces).
    pub fn subtract(&self, other: &Self) -> Vec<Self> {
        if !self.overlaps(other) {
            return if self.is_empty() { Vec::new() } else { vec![*self] };
        }

        let mut pieces = Vec::with_capacity(2);
        if other.start > self.start {
            pieces.push(Self::between(self.start, other.start));
        }
        if other.end < self.end {
            pieces.push(Self::between(other.end, self.end));
        }
        pieces
    }
}

#[derive(Serialize, Deserialize)]
struct WindowRepr {
    start: NaiveDateTime,
    #[serde(with = "duration_secs")]
    duration: TimeDelta,
}

impl From<Window> for WindowRepr {
    fn from(window: Window) -> Self {
        Self {
            start: window.start,
            duration: window.duration(),
        }
    }
}

impl TryFrom<WindowRepr> for Window {
    type Error = String;

    fn try_from(repr: WindowRepr) -> Result<Self, Self::Error> {
        repr.start
            .checked_add_signed(repr.duration)
            .map(|end| Window::between(repr.start, end))
            .ok_or_else(|| format!("window end out of range: {} + {}s", repr.start, repr.duration.num_seconds()))
    }
}

/// Intersection of two windows. Zero-length overlaps yield `None`.
pub fn intersect(a: &Window, b: &Window) -> Option<Window> {
    a.intersect(b)
}

/// Sorts windows and coalesces overlapping or touching ones.
pub fn merge_windows(mut windows: Vec<Window>) -> Vec<Window> {
    windows.retain(|w| !w.is_empty());
    windows.sort();

    let mut merged: Vec<Window> = Vec::with_capacity(windows.len());
    for w in windows {
        match merged.last_mut() {
            Some(last) if w.start <= last.end => {
                if w.end > last.end {
                    last.end = w.end;
                }
            }
            _ => merged.push(w),
        }
    }
    merged
}

/// Serializes a `TimeDelta` as whole seconds.
pub(crate) mod duration_secs {
    use chrono::TimeDelta;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(secs)
            .ok_or_else(|| de::Error::custom(format!("duration out of range: {secs}s")))
    }
}
