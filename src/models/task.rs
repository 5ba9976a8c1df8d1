//! Planning task model.
//!
//! A planning task is the stateful handle of one planning computation. It
//! starts `Pending`, becomes `Running` when the computation starts and ends
//! in `Success` (with a result) or `Error` (with a fault).
//!
//! ```text
//! Pending ──► Running ──► Success
//!    │           │
//!    └───────────┴──────► Error
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PlanningResult, TaskId};
use crate::error::{PlanResult, PlanningError};

/// Lifecycle state of a planning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanningTaskStatus {
    /// Submitted, not started.
    Pending,
    /// Computation in progress.
    Running,
    /// Finished with a result.
    Success,
    /// Finished with a fault.
    Error,
}

impl PlanningTaskStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    /// Whether `next` is a legal successor state.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Pending, Self::Error)
                | (Self::Running, Self::Success)
                | (Self::Running, Self::Error)
        )
    }
}

impl fmt::Display for PlanningTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Success => "Success",
            Self::Error => "Error",
        };
        f.write_str(s)
    }
}

/// Category of a task fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// The request was rejected before computation.
    InvalidRequest,
    /// The caller's deadline passed.
    Timeout,
    /// The caller cancelled the computation.
    Cancelled,
    /// Unexpected failure inside the planner.
    Internal,
}

/// Fault captured when a task ends in `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFault {
    /// Fault category.
    pub kind: FaultKind,
    /// Human-readable description.
    pub message: String,
}

impl From<&PlanningError> for TaskFault {
    fn from(err: &PlanningError) -> Self {
        let kind = match err {
            PlanningError::InvalidRequest(_) => FaultKind::InvalidRequest,
            PlanningError::Timeout { .. } => FaultKind::Timeout,
            PlanningError::Cancelled => FaultKind::Cancelled,
            PlanningError::Internal(_) => FaultKind::Internal,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Handle of one planning computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningTask {
    /// Task identifier.
    pub id: TaskId,
    /// Current state.
    pub status: PlanningTaskStatus,
    /// Percentage of pending items processed (0-100).
    pub progress: u8,
    /// The result, once `Success`.
    pub planning: Option<PlanningResult>,
    /// The fault, once `Error`.
    pub fault: Option<TaskFault>,
}

impl PlanningTask {
    /// Creates a pending task.
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            status: PlanningTaskStatus::Pending,
            progress: 0,
            planning: None,
            fault: None,
        }
    }

    /// A task rejected before it ever ran.
    pub fn rejected(id: TaskId, error: &PlanningError) -> Self {
        Self {
            status: PlanningTaskStatus::Error,
            fault: Some(TaskFault::from(error)),
            ..Self::new(id)
        }
    }

    /// Moves to `Running`.
    pub fn start(&mut self) -> PlanResult<()> {
        self.transition(PlanningTaskStatus::Running)
    }

    /// Records progress. Values never decrease and are capped at 100.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = self.progress.max(progress.min(100));
    }

    /// Moves to `Success` with the final result.
    pub fn succeed(&mut self, planning: PlanningResult) -> PlanResult<()> {
        self.transition(PlanningTaskStatus::Success)?;
        self.progress = 100;
        self.planning = Some(planning);
        Ok(())
    }

    /// Moves to `Error`, capturing the fault. Any partial result is dropped.
    pub fn fail(&mut self, error: &PlanningError) -> PlanResult<()> {
        self.transition(PlanningTaskStatus::Error)?;
        self.planning = None;
        self.fault = Some(TaskFault::from(error));
        Ok(())
    }

    /// Whether the task finished successfully.
    pub fn is_success(&self) -> bool {
        self.status == PlanningTaskStatus::Success
    }

    fn transition(&mut self, next: PlanningTaskStatus) -> PlanResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(PlanningError::Internal(format!(
                "illegal task transition {} -> {}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_happy_path() {
        let mut task = PlanningTask::new("T1".into());
        assert_eq!(task.status, PlanningTaskStatus::Pending);

        task.start().unwrap();
        task.set_progress(40);
        task.set_progress(20); // never decreases
        assert_eq!(task.progress, 40);

        task.succeed(PlanningResult::new()).unwrap();
        assert!(task.is_success());
        assert_eq!(task.progress, 100);
        assert!(task.planning.is_some());
        assert!(task.fault.is_none());
    }

    #[test]
    fn test_timeout_fault() {
        let mut task = PlanningTask::new("T1".into());
        task.start().unwrap();
        task.fail(&PlanningError::Timeout {
            elapsed: Duration::from_millis(5),
        })
        .unwrap();

        assert_eq!(task.status, PlanningTaskStatus::Error);
        assert!(task.planning.is_none());
        assert_eq!(task.fault.as_ref().unwrap().kind, FaultKind::Timeout);
    }

    #[test]
    fn test_pending_can_fail_directly() {
        let mut task = PlanningTask::new("T1".into());
        task.fail(&PlanningError::Internal("boom".into())).unwrap();
        assert_eq!(task.fault.unwrap().kind, FaultKind::Internal);
    }

    #[test]
    fn test_rejected_task() {
        let task = PlanningTask::rejected("T1".into(), &PlanningError::InvalidRequest(vec![]));
        assert_eq!(task.status, PlanningTaskStatus::Error);
        assert_eq!(task.progress, 0);
        assert_eq!(task.fault.unwrap().kind, FaultKind::InvalidRequest);
    }

    #[test]
    fn test_illegal_transitions() {
        let mut task = PlanningTask::new("T1".into());
        assert!(task.succeed(PlanningResult::new()).is_err()); // Pending -> Success

        task.start().unwrap();
        task.succeed(PlanningResult::new()).unwrap();
        assert!(task.start().is_err());
        assert!(task.fail(&PlanningError::Cancelled).is_err());
        assert!(task.is_success());
    }

    #[test]
    fn test_status_properties() {
        assert!(PlanningTaskStatus::Success.is_terminal());
        assert!(PlanningTaskStatus::Error.is_terminal());
        assert!(!PlanningTaskStatus::Running.is_terminal());
        assert_eq!(PlanningTaskStatus::Running.to_string(), "Running");
    }
}
