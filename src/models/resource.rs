//! Resource model.
//!
//! Resources are the workers that carry out plan items. Each resource has
//! availability windows, a qualification set, a start location and
//! optionally bookings that were committed before this planning run.
//!
//! # Invariants
//! - Availability windows do not overlap pairwise.
//! - Every booking lies within a single availability window.
//!
//! Both are enforced by [`validate_request`](crate::validation::validate_request).

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::qualification::{self, Qualification};
use super::{Location, PlanItemId, ResourceId, Window};

/// A resource that can be assigned to plan items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Periods the resource is available for planning.
    pub windows: Vec<Window>,
    /// Capabilities the resource holds.
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    /// Where the resource starts each availability window.
    pub start_location: Location,
    /// Items already assigned to this resource before planning.
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

/// A pre-existing assignment on a resource.
///
/// Bookings occupy time and move the resource to `location`, but are not
/// part of the planning result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// The item this booking belongs to.
    pub item_id: PlanItemId,
    /// Occupied time.
    pub window: Window,
    /// Where the booked work happens.
    pub location: Location,
}

impl Resource {
    /// Creates a resource with no availability.
    pub fn new(id: impl Into<ResourceId>, start_location: Location) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            windows: Vec::new(),
            qualifications: Vec::new(),
            start_location,
            bookings: Vec::new(),
        }
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an availability window.
    pub fn with_window(mut self, start: NaiveDateTime, duration: TimeDelta) -> Self {
        self.windows.push(Window::new(start, duration));
        self
    }

    /// Adds a qualification.
    pub fn with_qualification(mut self, qualification: impl Into<Qualification>) -> Self {
        self.qualifications.push(qualification.into());
        self
    }

    /// Adds a pre-existing booking.
    pub fn with_booking(mut self, booking: Booking) -> Self {
        self.bookings.push(booking);
        self
    }

    /// Whether this resource holds every qualification in `required`.
    pub fn is_qualified_for(&self, required: &[Qualification]) -> bool {
        qualification::covers(&self.qualifications, required)
    }

    /// Whether the resource is available at an instant.
    pub fn is_available_at(&self, instant: NaiveDateTime) -> bool {
        self.windows.iter().any(|w| w.contains(instant))
    }

    /// Total availability inside `horizon`.
    pub fn available_time_in(&self, horizon: &Window) -> TimeDelta {
        self.windows
            .iter()
            .filter_map(|w| w.intersect(horizon))
            .map(|w| w.duration())
            .fold(TimeDelta::zero(), |acc, d| acc + d)
    }
}

impl Booking {
    /// Creates a booking.
    pub fn new(item_id: impl Into<PlanItemId>, window: Window, location: Location) -> Self {
        Self {
            item_id: item_id.into(),
            window,
            location,
        }
    }
}
