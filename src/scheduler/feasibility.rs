//! Candidate window generation for one item on one resource.
//!
//! # Algorithm
//!
//! 1. Reject resources lacking a required qualification.
//! 2. Take the resource's free segments inside the planning window.
//! 3. Skip segments where the location policy forbids moving from the
//!    preceding position to the item, or from the item to the following slot.
//! 4. Shrink each segment by the travel time from the preceding slot and to
//!    the following slot.
//! 5. Intersect with the item's recurrence windows.
//! 6. Step through the remaining start range at the configured granularity.
//!
//! Steps 1-5 produce a short list of start ranges; step 6 is lazy.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{NaiveDateTime, TimeDelta};

use super::state::ResourceState;
use crate::config::PlannerConfig;
use crate::models::{recurrence, FailureReason, PlanItem, Window};

/// An item with its recurrence windows projected onto the planning window.
#[derive(Debug, Clone)]
pub struct ItemProfile<'i> {
    /// The item.
    pub item: &'i PlanItem,
    /// Planning window.
    pub horizon: Window,
    /// Where the item may take place, sorted. Unconstrained items get the
    /// whole planning window.
    pub allowed: Vec<Window>,
}

impl ItemProfile<'_> {
    fn allowed_overlapping(&self, window: Window) -> impl Iterator<Item = Window> + '_ {
        let first = self.allowed.partition_point(|a| a.end <= window.start);
        self.allowed[first..]
            .iter()
            .take_while(move |a| a.start < window.end)
            .filter_map(move |a| a.intersect(&window))
    }
}

/// Inclusive range of feasible start instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StartRange {
    first: NaiveDateTime,
    last: NaiveDateTime,
}

/// Lazy sequence of candidate windows, in chronological order.
#[derive(Debug, Clone)]
pub struct Candidates {
    ranges: std::vec::IntoIter<StartRange>,
    current: Option<StartRange>,
    duration: TimeDelta,
    step: TimeDelta,
}

impl Candidates {
    fn new(ranges: Vec<StartRange>, duration: TimeDelta, step: TimeDelta) -> Self {
        Self {
            ranges: ranges.into_iter(),
            current: None,
            duration,
            step,
        }
    }

    fn empty() -> Self {
        Self::new(Vec::new(), TimeDelta::zero(), TimeDelta::minutes(1))
    }
}

impl Iterator for Candidates {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        loop {
            if let Some(range) = self.current.as_mut() {
                if range.first <= range.last {
                    let start = range.first;
                    range.first += self.step;
                    return Some(Window::new(start, self.duration));
                }
                self.current = None;
            }
            self.current = Some(self.ranges.next()?);
        }
    }
}

/// Chronological merge of per-resource candidate streams.
///
/// Yields `(window, source index)` ordered by start, then by source index.
/// Every source must already be chronological; only one pending window
/// per source is held at a time.
#[derive(Debug)]
pub struct MergedCandidates<I> {
    sources: Vec<I>,
    heads: BinaryHeap<Reverse<(NaiveDateTime, usize, Window)>>,
}

impl<I: Iterator<Item = Window>> MergedCandidates<I> {
    /// Merges `sources`; a source's index is its position in the vector.
    pub fn new(sources: Vec<I>) -> Self {
        let mut merged = Self {
            heads: BinaryHeap::with_capacity(sources.len()),
            sources,
        };
        for index in 0..merged.sources.len() {
            merged.pull(index);
        }
        merged
    }

    fn pull(&mut self, index: usize) {
        if let Some(window) = self.sources[index].next() {
            self.heads.push(Reverse((window.start, index, window)));
        }
    }
}

impl<I: Iterator<Item = Window>> Iterator for MergedCandidates<I> {
    type Item = (Window, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((_, index, window)) = self.heads.pop()?;
        self.pull(index);
        Some((window, index))
    }
}

/// Decides where an item fits on a resource.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityEngine<'c> {
    config: &'c PlannerConfig,
}

impl<'c> FeasibilityEngine<'c> {
    /// Creates an engine using `config` for granularity and travel rules.
    pub fn new(config: &'c PlannerConfig) -> Self {
        Self { config }
    }

    /// Projects an item's recurrence constraints onto the planning window.
    pub fn profile<'i>(&self, item: &'i PlanItem, horizon: &Window) -> ItemProfile<'i> {
        let mut allowed = recurrence::allowed_windows(&item.recurrences, horizon);
        allowed.sort();
        ItemProfile {
            item,
            horizon: *horizon,
            allowed,
        }
    }

    /// Every window where the item fits on the resource, earliest first.
    ///
    /// Starts are spaced by the configured granularity, beginning at the
    /// earliest feasible instant of each free stretch.
    pub fn candidates(&self, profile: &ItemProfile<'_>, state: &ResourceState<'_>) -> Candidates {
        let item = profile.item;
        if item.duration <= TimeDelta::zero()
            || !state.resource().is_qualified_for(&item.qualifications)
        {
            return Candidates::empty();
        }
        Candidates::new(
            self.start_ranges(profile, state),
            item.duration,
            self.config.granularity(),
        )
    }

    /// The earliest window where the item fits on the resource.
    pub fn earliest(&self, profile: &ItemProfile<'_>, state: &ResourceState<'_>) -> Option<Window> {
        self.candidates(profile, state).next()
    }

    /// Explains why no resource offers a candidate.
    ///
    /// Each resource is checked stage by stage; the reason reported is the
    /// furthest stage any resource reached.
    pub fn diagnose(&self, profile: &ItemProfile<'_>, states: &[ResourceState<'_>]) -> FailureReason {
        states
            .iter()
            .map(|s| self.diagnose_resource(profile, s))
            .max()
            .unwrap_or(FailureReason::NoResources)
    }

    fn diagnose_resource(&self, profile: &ItemProfile<'_>, state: &ResourceState<'_>) -> FailureReason {
        let item = profile.item;
        if !state.resource().is_qualified_for(&item.qualifications) {
            return FailureReason::NoQualifiedResource;
        }
        if state.resource().available_time_in(&profile.horizon) <= TimeDelta::zero() {
            return FailureReason::OutsidePlanningWindow;
        }

        let segments = state.free_segments(&profile.horizon);
        if segments.is_empty() {
            return FailureReason::NoTimeWindowLargeEnough;
        }

        let mut matched = false;
        for segment in &segments {
            for piece in profile.allowed_overlapping(segment.window) {
                matched = true;
                if piece.duration() >= item.duration {
                    return FailureReason::LocationUnreachable;
                }
            }
        }

        if matched {
            FailureReason::NoTimeWindowLargeEnough
        } else {
            FailureReason::NoRecurrenceMatch
        }
    }

    fn start_ranges(&self, profile: &ItemProfile<'_>, state: &ResourceState<'_>) -> Vec<StartRange> {
        let item = profile.item;
        let home = &state.resource().start_location;
        let mut ranges = Vec::new();

        for segment in state.free_segments(&profile.horizon) {
            let from = segment.previous.map_or(home, |s| &s.location);
            if !self.config.location_policy.allows(from, &item.location) {
                continue;
            }
            if segment
                .next
                .is_some_and(|next| !self.config.location_policy.allows(&item.location, &next.location))
            {
                continue;
            }

            let mut earliest = segment.window.start;
            if let Some(previous) = segment.previous {
                earliest = earliest.max(previous.window.end + self.config.travel_time(from, &item.location));
            }
            let mut latest_end = segment.window.end;
            if let Some(next) = segment.next {
                latest_end = latest_end.min(next.window.start - self.config.travel_time(&item.location, &next.location));
            }
            if latest_end - earliest < item.duration {
                continue;
            }

            let reachable = Window::between(earliest, latest_end);
            for piece in profile.allowed_overlapping(reachable) {
                if piece.duration() >= item.duration {
                    ranges.push(StartRange {
                        first: piece.start,
                        last: piece.end - item.duration,
                    });
                }
            }
        }

        ranges
    }
}
