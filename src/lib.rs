//! Resource planning engine for the U-Engine ecosystem.
//!
//! Places plan items (units of work with a duration, a location, required
//! qualifications and optional weekly recurrence constraints) onto
//! resources with availability windows, inside a bounded planning window.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Window`, `RecurrenceConstraint`,
//!   `Resource`, `PlanItem`, `PlanningRequest`, `PlanningResult`,
//!   `PlanningTask`
//! - **`validation`**: Input integrity checks (duplicate IDs, overlapping
//!   windows, bookings, item counts)
//! - **`dispatching`**: Item ordering rules for Regular mode
//! - **`scheduler`**: Feasibility engine, greedy planner and KPIs
//! - **`service`**: Async planning tasks with progress, timeout and
//!   cancellation
//! - **`config`**: Planner configuration (TOML)
//!
//! # Modes
//!
//! - **Regular**: fills the plan greedily, earliest start first, ties to
//!   the lowest resource id. Not globally optimal.
//! - **Options**: lists every feasible placement of a single item without
//!   committing any, so the caller can pick one.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod service;
pub mod validation;

pub use config::{LocationPolicy, PlannerConfig};
pub use error::{ConfigError, PlanResult, PlanningError};
