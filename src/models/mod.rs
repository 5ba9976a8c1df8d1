//! Planning domain models.
//!
//! Provides the data types of a planning request and its outcome:
//! resources with availability windows, plan items with recurrence
//! constraints, and the result/task types handed back to the caller.
//!
//! # Domain Mappings
//!
//! | u-planning | Field Service | Healthcare | Facilities |
//! |------------|---------------|------------|------------|
//! | Resource | Technician | Nurse | Cleaner |
//! | PlanItem | Service Visit | Home Visit | Inspection |
//! | Qualification | Certification | License | Clearance |
//! | Window | Shift | Roster Slot | Opening Hours |

mod ids;
mod location;
mod plan_item;
pub mod qualification;
pub mod recurrence;
mod request;
mod resource;
mod result;
mod task;
pub mod window;

pub use ids::{PlanItemId, ResourceId, TaskId};
pub use location::Location;
pub use plan_item::PlanItem;
pub use qualification::Qualification;
pub use recurrence::RecurrenceConstraint;
pub use request::{PlanningMode, PlanningRequest};
pub use resource::{Booking, Resource};
pub use result::{FailedToPlanItem, FailureReason, PlannedItem, PlanningResult};
pub use task::{FaultKind, PlanningTask, PlanningTaskStatus, TaskFault};
pub use window::Window;
