//! Collects per-item outcomes into a [`PlanningResult`].
//!
//! Every pending item must be classified exactly once: planned or failed.
//! Options mode may record several options for the same item, but never
//! mixes options with a failure. Violations are internal faults.

use std::collections::HashMap;

use crate::error::{PlanResult, PlanningError};
use crate::models::{
    FailedToPlanItem, FailureReason, PlanItem, PlanItemId, PlannedItem, PlanningMode,
    PlanningResult, ResourceId, Window,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Planned,
    Failed,
}

/// Builds a planning result while enforcing exactly-once classification.
#[derive(Debug)]
pub struct ResultAggregator {
    mode: PlanningMode,
    result: PlanningResult,
    outcomes: HashMap<PlanItemId, Outcome>,
}

impl ResultAggregator {
    /// Creates an empty aggregator for `mode`.
    pub fn new(mode: PlanningMode) -> Self {
        Self {
            mode,
            result: PlanningResult::new(),
            outcomes: HashMap::new(),
        }
    }

    /// Records a placement (Regular) or an option (Options).
    pub fn planned(&mut self, item: &PlanItem, window: Window, resource_id: ResourceId) -> PlanResult<()> {
        match (self.mode, self.outcomes.get(&item.id)) {
            (_, None) | (PlanningMode::Options, Some(Outcome::Planned)) => {}
            (_, Some(previous)) => {
                return Err(PlanningError::Internal(format!(
                    "item {} planned after being classified as {previous:?}",
                    item.id
                )));
            }
        }
        self.outcomes.insert(item.id.clone(), Outcome::Planned);
        self.result.planned_items.push(PlannedItem {
            item: item.clone(),
            window,
            resource_id,
        });
        Ok(())
    }

    /// Records that an item could not be placed.
    pub fn failed(&mut self, item: &PlanItem, reason: FailureReason) -> PlanResult<()> {
        if let Some(previous) = self.outcomes.get(&item.id) {
            return Err(PlanningError::Internal(format!(
                "item {} failed after being classified as {previous:?}",
                item.id
            )));
        }
        self.outcomes.insert(item.id.clone(), Outcome::Failed);
        self.result.failed_to_plan_items.push(FailedToPlanItem {
            item: item.clone(),
            reason,
        });
        Ok(())
    }

    /// Number of items classified so far.
    pub fn classified(&self) -> usize {
        self.outcomes.len()
    }

    /// Finishes the result, checking that every pending item was classified.
    pub fn finish(self, pending: &[PlanItem]) -> PlanResult<PlanningResult> {
        if let Some(missing) = pending.iter().find(|i| !self.outcomes.contains_key(&i.id)) {
            return Err(PlanningError::Internal(format!(
                "item {} was never classified",
                missing.id
            )));
        }
        if self.outcomes.len() != pending.len() {
            return Err(PlanningError::Internal(format!(
                "classified {} items but {} were pending",
                self.outcomes.len(),
                pending.len()
            )));
        }
        Ok(self.result)
    }
}
