//! Request context for dispatching rule evaluation.

use std::collections::HashMap;

use crate::models::{PlanItemId, PlanningRequest};

/// Request-derived facts passed to dispatching rules.
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    /// Position of each item in the request (item_id → index).
    pub input_position: HashMap<PlanItemId, usize>,
    /// Number of resources qualified for each item.
    pub qualified_resources: HashMap<PlanItemId, usize>,
}

impl SchedulingContext {
    /// Builds the context for a request.
    pub fn from_request(request: &PlanningRequest) -> Self {
        let mut input_position = HashMap::with_capacity(request.pending_plan_items.len());
        let mut qualified_resources = HashMap::with_capacity(request.pending_plan_items.len());

        for (index, item) in request.pending_plan_items.iter().enumerate() {
            input_position.insert(item.id.clone(), index);
            let qualified = request
                .resources
                .iter()
                .filter(|r| r.is_qualified_for(&item.qualifications))
                .count();
            qualified_resources.insert(item.id.clone(), qualified);
        }

        Self {
            input_position,
            qualified_resources,
        }
    }

    /// Sets the qualified resource count for an item.
    pub fn with_qualified_resources(mut self, item_id: impl Into<PlanItemId>, count: usize) -> Self {
        self.qualified_resources.insert(item_id.into(), count);
        self
    }
}
