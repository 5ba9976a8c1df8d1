//! Planning result model.
//!
//! A result partitions the pending items into placed items and items that
//! could not be placed, each failure carrying a reason.
//!
//! # Invariant
//! In Regular mode every pending item appears exactly once, in one of the
//! two lists. In Options mode an item with candidates appears once per
//! candidate in `planned_items`, otherwise once in `failed_to_plan_items`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PlanItem, PlanItemId, ResourceId, Window};

/// Outcome of a successful planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningResult {
    /// Placed items (or options, in Options mode).
    pub planned_items: Vec<PlannedItem>,
    /// Items that could not be placed.
    pub failed_to_plan_items: Vec<FailedToPlanItem>,
}

/// An item placed on a resource during a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedItem {
    /// The placed item.
    pub item: PlanItem,
    /// When it happens.
    pub window: Window,
    /// Who does it.
    pub resource_id: ResourceId,
}

/// An item that could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedToPlanItem {
    /// The unplaced item.
    pub item: PlanItem,
    /// Why no placement was found.
    pub reason: FailureReason,
}

/// Why an item could not be placed.
///
/// Variants are ordered by how far the search got: when several resources
/// fail for different reasons, the furthest one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// The request contains no resources.
    NoResources,
    /// No resource holds the required qualifications.
    NoQualifiedResource,
    /// Qualified resources have no free time inside the planning window.
    OutsidePlanningWindow,
    /// Free time never coincides with the item's recurrence constraints.
    NoRecurrenceMatch,
    /// Matching free time exists, but no stretch is long enough.
    NoTimeWindowLargeEnough,
    /// Time fits, but the location cannot be reached.
    LocationUnreachable,
}

impl FailureReason {
    /// Human-readable description.
    pub fn reason_text(&self) -> &'static str {
        match self {
            Self::NoResources => "no resources available",
            Self::NoQualifiedResource => "no qualified resource available",
            Self::OutsidePlanningWindow => "outside planning window",
            Self::NoRecurrenceMatch => "no availability matches the recurrence constraints",
            Self::NoTimeWindowLargeEnough => "no time window large enough",
            Self::LocationUnreachable => "location cannot be reached in time",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason_text())
    }
}

impl FailedToPlanItem {
    /// Human-readable failure description.
    pub fn failed_reason_text(&self) -> &'static str {
        self.reason.reason_text()
    }
}

impl PlanningResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of planned entries.
    pub fn planned_count(&self) -> usize {
        self.planned_items.len()
    }

    /// Number of failed items.
    pub fn failed_count(&self) -> usize {
        self.failed_to_plan_items.len()
    }

    /// Planned entries for an item (several in Options mode).
    pub fn planned_for_item(&self, item_id: &PlanItemId) -> Vec<&PlannedItem> {
        self.planned_items
            .iter()
            .filter(|p| &p.item.id == item_id)
            .collect()
    }

    /// Planned entries for a resource, in result order.
    pub fn planned_for_resource(&self, resource_id: &ResourceId) -> Vec<&PlannedItem> {
        self.planned_items
            .iter()
            .filter(|p| &p.resource_id == resource_id)
            .collect()
    }

    /// Failure record for an item.
    pub fn failure_for_item(&self, item_id: &PlanItemId) -> Option<&FailedToPlanItem> {
        self.failed_to_plan_items
            .iter()
            .find(|f| &f.item.id == item_id)
    }

    /// Whether every item was placed.
    pub fn is_complete(&self) -> bool {
        self.failed_to_plan_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::{NaiveDate, TimeDelta};

    fn item(id: &str) -> PlanItem {
        PlanItem::new(id, TimeDelta::hours(1), Location::new("Haarlem", 52.38, 4.64))
    }

    fn window(hour: u32) -> Window {
        let start = NaiveDate::from_ymd_opt(2000, 1, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Window::new(start, TimeDelta::hours(1))
    }

    fn sample_result() -> PlanningResult {
        PlanningResult {
            planned_items: vec![
                PlannedItem {
                    item: item("I1"),
                    window: window(9),
                    resource_id: "R1".into(),
                },
                PlannedItem {
                    item: item("I2"),
                    window: window(9),
                    resource_id: "R2".into(),
                },
                PlannedItem {
                    item: item("I3"),
                    window: window(10),
                    resource_id: "R1".into(),
                },
            ],
            failed_to_plan_items: vec![FailedToPlanItem {
                item: item("I4"),
                reason: FailureReason::NoQualifiedResource,
            }],
        }
    }

    #[test]
    fn test_counts_and_lookups() {
        let r = sample_result();
        assert_eq!(r.planned_count(), 3);
        assert_eq!(r.failed_count(), 1);
        assert!(!r.is_complete());
        assert_eq!(r.planned_for_resource(&"R1".into()).len(), 2);
        assert_eq!(r.planned_for_item(&"I2".into()).len(), 1);
        assert!(r.failure_for_item(&"I1".into()).is_none());
        assert_eq!(
            r.failure_for_item(&"I4".into()).unwrap().failed_reason_text(),
            "no qualified resource available"
        );
    }

    #[test]
    fn test_reason_ordering() {
        assert!(FailureReason::NoQualifiedResource < FailureReason::OutsidePlanningWindow);
        assert!(FailureReason::NoTimeWindowLargeEnough < FailureReason::LocationUnreachable);
        assert_eq!(
            FailureReason::NoTimeWindowLargeEnough.to_string(),
            "no time window large enough"
        );
    }

    #[test]
    fn test_empty_result() {
        let r = PlanningResult::new();
        assert!(r.is_complete());
        assert_eq!(r.planned_count(), 0);
    }
}
