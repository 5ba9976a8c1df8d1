//! Plan item model.
//!
//! A plan item is a unit of work waiting to be placed: it has a fixed
//! duration, optional recurrence constraints, a location and the
//! qualifications a resource needs to carry it out.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::window::duration_secs;
use super::{Location, PlanItemId, Qualification, RecurrenceConstraint};

/// An item to be planned.
///
/// An empty `recurrences` list leaves the item unconstrained by time of
/// day: it may go anywhere inside the planning window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    /// Unique item identifier.
    pub id: PlanItemId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// How long the work takes. Must be positive.
    #[serde(with = "duration_secs")]
    pub duration: TimeDelta,
    /// Allowed day-of-week / time-of-day ranges (union).
    #[serde(default)]
    pub recurrences: Vec<RecurrenceConstraint>,
    /// Where the work happens.
    pub location: Location,
    /// Qualifications a resource must hold.
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    /// Ordering priority (higher = earlier), used by the `Priority` rule.
    #[serde(default)]
    pub priority: i32,
}

impl PlanItem {
    /// Creates an item.
    pub fn new(id: impl Into<PlanItemId>, duration: TimeDelta, location: Location) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            duration,
            recurrences: Vec::new(),
            location,
            qualifications: Vec::new(),
            priority: 0,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a recurrence constraint.
    pub fn with_recurrence(mut self, recurrence: RecurrenceConstraint) -> Self {
        self.recurrences.push(recurrence);
        self
    }

    /// Adds a required qualification.
    pub fn with_qualification(mut self, qualification: impl Into<Qualification>) -> Self {
        self.qualifications.push(qualification.into());
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether time-of-day constraints apply.
    pub fn is_time_constrained(&self) -> bool {
        !self.recurrences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn haarlem() -> Location {
        Location::new("Haarlem", 52.377639, 4.642735)
    }

    #[test]
    fn test_plan_item_builder() {
        let item = PlanItem::new("I1", TimeDelta::hours(1), haarlem())
            .with_name("Maintenance")
            .with_recurrence(RecurrenceConstraint::hours(Weekday::Mon, 8, 20))
            .with_qualification("Flux Capacitor")
            .with_priority(5);

        assert_eq!(item.id, PlanItemId::from("I1"));
        assert_eq!(item.duration, TimeDelta::hours(1));
        assert!(item.is_time_constrained());
        assert_eq!(item.qualifications.len(), 1);
        assert_eq!(item.priority, 5);
    }

    #[test]
    fn test_duration_serialized_as_seconds() {
        let item = PlanItem::new("I1", TimeDelta::minutes(90), haarlem());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["duration"], 5400);

        let back: PlanItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
