//! Planning algorithms and KPI evaluation.
//!
//! # Algorithm
//!
//! [`Planner`] runs a greedy earliest-start heuristic: items are taken in
//! rule order and each goes to the resource offering the earliest feasible
//! window. It is not optimal, but fast and deterministic.
//!
//! [`FeasibilityEngine`] answers "where could this item go on this
//! resource?" and, when nowhere, "why not?". Both planning modes are built
//! on it.
//!
//! # KPI
//!
//! [`PlanningKpi`] computes placement rate and resource utilization.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod aggregator;
mod control;
mod feasibility;
mod kpi;
mod planner;
mod state;

pub use aggregator::ResultAggregator;
pub use control::RunControl;
pub use feasibility::{Candidates, FeasibilityEngine, ItemProfile, MergedCandidates};
pub use kpi::PlanningKpi;
pub use planner::Planner;
pub use state::{FreeSegment, ResourceState, Slot};
