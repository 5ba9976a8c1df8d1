//! Mutable per-resource planning state.
//!
//! Tracks the occupied slots of one resource (pre-existing bookings plus
//! placements committed during this run) and derives the free time left
//! inside its availability windows.

use crate::models::{Location, Resource, ResourceId, Window};

/// Occupied time on a resource, with where the work happens.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Occupied time.
    pub window: Window,
    /// Work location; the resource is here when the slot ends.
    pub location: Location,
}

/// A stretch of free time and its neighbouring slots.
///
/// Neighbours are only reported within the same availability window: each
/// availability window starts from the resource's start location.
#[derive(Debug, Clone, Copy)]
pub struct FreeSegment<'s> {
    /// Free time, clipped to the planning window.
    pub window: Window,
    /// Slot ending right before this segment.
    pub previous: Option<&'s Slot>,
    /// Slot starting right after this segment.
    pub next: Option<&'s Slot>,
}

/// Planning state of one resource.
#[derive(Debug, Clone)]
pub struct ResourceState<'a> {
    resource: &'a Resource,
    availability: Vec<Window>,
    slots: Vec<Slot>,
}

impl<'a> ResourceState<'a> {
    /// Creates the state, seeded with the resource's bookings.
    pub fn new(resource: &'a Resource) -> Self {
        let mut availability: Vec<Window> = resource
            .windows
            .iter()
            .copied()
            .filter(|w| !w.is_empty())
            .collect();
        availability.sort();

        let mut slots: Vec<Slot> = resource
            .bookings
            .iter()
            .map(|b| Slot {
                window: b.window,
                location: b.location.clone(),
            })
            .collect();
        slots.sort_by(|a, b| a.window.cmp(&b.window));

        Self {
            resource,
            availability,
            slots,
        }
    }

    /// The underlying resource.
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Resource identifier.
    pub fn id(&self) -> &'a ResourceId {
        &self.resource.id
    }

    /// Occupied slots, sorted by start.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Marks `window` as occupied by work at `location`.
    pub fn commit(&mut self, window: Window, location: Location) {
        let at = self.slots.partition_point(|s| s.window < window);
        self.slots.insert(at, Slot { window, location });
    }

    /// Free time inside availability and `horizon`, in chronological order.
    pub fn free_segments(&self, horizon: &Window) -> Vec<FreeSegment<'_>> {
        let mut segments = Vec::new();

        for available in &self.availability {
            if !available.overlaps(horizon) {
                continue;
            }

            let first = self.slots.partition_point(|s| s.window.end <= available.start);
            let inside = self.slots[first..]
                .iter()
                .take_while(|s| s.window.start < available.end);

            let mut cursor = available.start;
            let mut previous: Option<&Slot> = None;
            for slot in inside {
                if slot.window.start > cursor {
                    push_clipped(
                        &mut segments,
                        Window::between(cursor, slot.window.start),
                        horizon,
                        previous,
                        Some(slot),
                    );
                }
                previous = Some(slot);
                cursor = cursor.max(slot.window.end);
            }
            if cursor < available.end {
                push_clipped(
                    &mut segments,
                    Window::between(cursor, available.end),
                    horizon,
                    previous,
                    None,
                );
            }
        }

        segments
    }

    /// Remaining free time inside `horizon` (sub-windows only).
    pub fn remaining_free_windows(&self, horizon: &Window) -> Vec<Window> {
        self.free_segments(horizon).into_iter().map(|s| s.window).collect()
    }
}

fn push_clipped<'s>(
    segments: &mut Vec<FreeSegment<'s>>,
    free: Window,
    horizon: &Window,
    previous: Option<&'s Slot>,
    next: Option<&'s Slot>,
) {
    if let Some(window) = free.intersect(horizon) {
        segments.push(FreeSegment {
            window,
            previous,
            next,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Booking;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn haarlem() -> Location {
        Location::new("Haarlem", 52.377639, 4.642735)
    }

    fn amsterdam() -> Location {
        Location::new("Amsterdam", 52.372776, 4.892222)
    }

    fn january() -> Window {
        Window::new(at(1, 0), TimeDelta::days(31))
    }

    #[test]
    fn test_free_segments_without_slots() {
        let r = Resource::new("R1", haarlem())
            .with_window(at(2, 9), TimeDelta::hours(8))
            .with_window(at(1, 9), TimeDelta::hours(8));
        let state = ResourceState::new(&r);

        let free = state.remaining_free_windows(&january());
        assert_eq!(
            free,
            vec![
                Window::between(at(1, 9), at(1, 17)),
                Window::between(at(2, 9), at(2, 17)),
            ]
        );
    }

    #[test]
    fn test_bookings_are_subtracted() {
        let r = Resource::new("R1", haarlem())
            .with_window(at(1, 9), TimeDelta::hours(8))
            .with_booking(Booking::new(
                "B1",
                Window::between(at(1, 11), at(1, 12)),
                amsterdam(),
            ));
        let state = ResourceState::new(&r);
        let segments = state.free_segments(&january());

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].window, Window::between(at(1, 9), at(1, 11)));
        assert!(segments[0].previous.is_none());
        assert_eq!(segments[0].next.unwrap().location, amsterdam());
        assert_eq!(segments[1].window, Window::between(at(1, 12), at(1, 17)));
        assert_eq!(segments[1].previous.unwrap().location, amsterdam());
        assert!(segments[1].next.is_none());
    }

    #[test]
    fn test_commit_keeps_slots_sorted() {
        let r = Resource::new("R1", haarlem()).with_window(at(1, 9), TimeDelta::hours(8));
        let mut state = ResourceState::new(&r);
        state.commit(Window::between(at(1, 14), at(1, 15)), haarlem());
        state.commit(Window::between(at(1, 9), at(1, 10)), haarlem());

        let starts: Vec<_> = state.slots().iter().map(|s| s.window.start).collect();
        assert_eq!(starts, vec![at(1, 9), at(1, 14)]);
        assert_eq!(
            state.remaining_free_windows(&january()),
            vec![
                Window::between(at(1, 10), at(1, 14)),
                Window::between(at(1, 15), at(1, 17)),
            ]
        );
    }

    #[test]
    fn test_clipped_to_horizon() {
        let r = Resource::new("R1", haarlem()).with_window(at(1, 9), TimeDelta::hours(8));
        let state = ResourceState::new(&r);
        let horizon = Window::between(at(1, 12), at(1, 20));
        assert_eq!(
            state.remaining_free_windows(&horizon),
            vec![Window::between(at(1, 12), at(1, 17))]
        );
        assert!(state
            .remaining_free_windows(&Window::between(at(5, 0), at(6, 0)))
            .is_empty());
    }

    #[test]
    fn test_fully_booked() {
        let r = Resource::new("R1", haarlem())
            .with_window(at(1, 9), TimeDelta::hours(2))
            .with_booking(Booking::new("B1", Window::between(at(1, 9), at(1, 11)), haarlem()));
        let state = ResourceState::new(&r);
        assert!(state.free_segments(&january()).is_empty());
    }
}
