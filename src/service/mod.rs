//! Task-based planning on the Tokio runtime.
//!
//! A submission returns a [`PlanningHandle`] right away. The computation
//! runs in the background; the handle streams [`ProgressUpdate`]s and
//! resolves to the finished [`PlanningTask`](crate::models::PlanningTask).
//!
//! Deadlines and cancellation are cooperative. When either fires the task
//! ends in `Error` and any partial planning is discarded.

mod progress;
mod task_planner;

pub use progress::ProgressUpdate;
pub use task_planner::{PlanOptions, PlanningHandle, TaskPlanner};
