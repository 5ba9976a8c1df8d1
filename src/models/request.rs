//! Planning request model.

use serde::{Deserialize, Serialize};

use super::{PlanItem, Resource, Window};

/// Planning policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanningMode {
    /// Fill the planning as far as possible, committing each placement.
    #[default]
    Regular,
    /// Enumerate every feasible placement of a single item, committing none.
    Options,
}

/// Input of a planning run.
///
/// Options mode requires exactly one pending item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequest {
    /// Planning policy.
    #[serde(default)]
    pub mode: PlanningMode,
    /// Resources to plan for.
    pub resources: Vec<Resource>,
    /// Horizon bounding every placement.
    pub planning_window: Window,
    /// Items that need to be planned.
    pub pending_plan_items: Vec<PlanItem>,
}

impl PlanningRequest {
    /// Creates an empty Regular-mode request for a horizon.
    pub fn new(planning_window: Window) -> Self {
        Self {
            mode: PlanningMode::Regular,
            resources: Vec::new(),
            planning_window,
            pending_plan_items: Vec::new(),
        }
    }

    /// Sets the planning mode.
    pub fn with_mode(mut self, mode: PlanningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Adds a pending item.
    pub fn with_item(mut self, item: PlanItem) -> Self {
        self.pending_plan_items.push(item);
        self
    }

    /// Number of pending items.
    pub fn item_count(&self) -> usize {
        self.pending_plan_items.len()
    }
}
