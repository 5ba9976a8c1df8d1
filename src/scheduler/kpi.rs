//! Planning quality metrics (KPIs).
//!
//! Computes summary indicators from a finished planning result and the
//! request it answered.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placement Rate | Placed items / pending items |
//! | Planned Time | Sum of placed window lengths |
//! | Utilization | Planned time / available time in the planning window |
//!
//! Options-mode results list alternatives rather than a plan, so their
//! utilization is not meaningful; placement counts distinct items.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::{HashMap, HashSet};

use chrono::TimeDelta;

use crate::models::{PlanningMode, PlanningRequest, PlanningResult, ResourceId};

/// Planning performance indicators.
#[derive(Debug, Clone)]
pub struct PlanningKpi {
    /// Distinct items with at least one placement.
    pub planned_count: usize,
    /// Items that could not be placed.
    pub failed_count: usize,
    /// Fraction of pending items placed (0.0..1.0).
    pub placement_rate: f64,
    /// Total time of placed windows.
    pub planned_time: TimeDelta,
    /// Average resource utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Per-resource utilization. Resources without availability inside
    /// the planning window are left out.
    pub utilization_by_resource: HashMap<ResourceId, f64>,
}

impl PlanningKpi {
    /// Computes KPIs from a result and its request.
    ///
    /// # Arguments
    /// * `result` - The successful planning result.
    /// * `request` - The request it answered (for availability and horizon).
    pub fn calculate(result: &PlanningResult, request: &PlanningRequest) -> Self {
        let planned_ids: HashSet<_> = result.planned_items.iter().map(|p| &p.item.id).collect();
        let planned_count = planned_ids.len();
        let failed_count = result.failed_count();

        let total = request.pending_plan_items.len();
        let placement_rate = if total == 0 {
            1.0
        } else {
            planned_count as f64 / total as f64
        };

        let mut busy: HashMap<&ResourceId, TimeDelta> = HashMap::new();
        for planned in &result.planned_items {
            *busy.entry(&planned.resource_id).or_insert_with(TimeDelta::zero) += planned.window.duration();
        }
        let planned_time = busy.values().fold(TimeDelta::zero(), |acc, d| acc + *d);

        let mut utilization_by_resource = HashMap::new();
        if request.mode == PlanningMode::Regular {
            for resource in &request.resources {
                let available = resource.available_time_in(&request.planning_window);
                if available <= TimeDelta::zero() {
                    continue;
                }
                let used = busy.get(&resource.id).copied().unwrap_or_else(TimeDelta::zero);
                utilization_by_resource.insert(
                    resource.id.clone(),
                    used.num_seconds() as f64 / available.num_seconds() as f64,
                );
            }
        }

        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_resource.values().sum();
            sum / utilization_by_resource.len() as f64
        };

        Self {
            planned_count,
            failed_count,
            placement_rate,
            planned_time,
            avg_utilization,
            utilization_by_resource,
        }
    }

    /// Whether the planning meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_placement_rate: f64, min_utilization: f64) -> bool {
        self.placement_rate >= min_placement_rate && self.avg_utilization >= min_utilization
    }
}
