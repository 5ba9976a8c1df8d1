//! Recurrence constraints.
//!
//! A recurrence constraint restricts an item to a time-of-day range on a
//! given day of the week ("every Monday between 08:00 and 20:00"). An item
//! may carry several; the allowed time is their union.
//!
//! # Overnight Ranges
//! When `end <= start` the range runs past midnight and ends on the
//! following day. `00:00–00:00` therefore covers the whole day.

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use super::window::{merge_windows, Window};

/// Day-of-week scoped time-of-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceConstraint {
    /// Day on which the range starts.
    pub day_of_week: Weekday,
    /// Time of day the range opens.
    pub start: NaiveTime,
    /// Time of day the range closes (next day if `end <= start`).
    pub end: NaiveTime,
}

impl RecurrenceConstraint {
    /// Creates a constraint.
    pub fn new(day_of_week: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            day_of_week,
            start,
            end,
        }
    }

    /// Creates a constraint from whole hours, e.g. `hours(Weekday::Mon, 8, 20)`.
    ///
    /// Hours outside `0..24` are clamped to midnight.
    pub fn hours(day_of_week: Weekday, start_hour: u32, end_hour: u32) -> Self {
        let time = |h: u32| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(day_of_week, time(start_hour), time(end_hour))
    }

    /// Whether the range runs past midnight.
    #[inline]
    pub fn runs_overnight(&self) -> bool {
        self.end <= self.start
    }

    /// Length of one occurrence.
    pub fn length(&self) -> TimeDelta {
        let span = self.end - self.start;
        if self.runs_overnight() {
            span + TimeDelta::days(1)
        } else {
            span
        }
    }

    /// The occurrence starting on `date`, if `date` has the right weekday.
    pub fn occurrence_on(&self, date: NaiveDate) -> Option<Window> {
        (date.weekday() == self.day_of_week)
            .then(|| Window::new(date.and_time(self.start), self.length()))
    }

    /// Occurrences clipped to `window`, in chronological order.
    ///
    /// Starts scanning one day early so that an overnight range opened the
    /// day before `window` still contributes its tail.
    pub fn project_onto(&self, window: &Window) -> impl Iterator<Item = Window> + '_ {
        let window = *window;
        let first = window
            .start
            .date()
            .pred_opt()
            .unwrap_or_else(|| window.start.date());
        let last = window.end.date();

        first
            .iter_days()
            .take_while(move |d| *d <= last)
            .filter_map(move |d| self.occurrence_on(d))
            .filter_map(move |occurrence| occurrence.intersect(&window))
    }
}

/// Projects one constraint onto a window.
pub fn project_recurrence_onto_window(
    constraint: &RecurrenceConstraint,
    window: &Window,
) -> Vec<Window> {
    constraint.project_onto(window).collect()
}

/// Union of all constraint projections inside `window`, sorted and merged.
///
/// An empty constraint list leaves the item unconstrained by time of day,
/// so the whole window is allowed.
pub fn allowed_windows(constraints: &[RecurrenceConstraint], window: &Window) -> Vec<Window> {
    if constraints.is_empty() {
        return if window.is_empty() { Vec::new() } else { vec![*window] };
    }

    merge_windows(
        constraints
            .iter()
            .flat_map(|c| c.project_onto(window))
            .collect(),
    )
}
