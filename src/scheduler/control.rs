//! Cooperative limits for a planning run.
//!
//! The planner polls [`RunControl::checkpoint`] before each item, while
//! enumerating resources and candidates, and once more before the result is
//! assembled. A passed deadline or a cancelled token stops the
//! run; partial work is discarded by the caller.

use std::fmt;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::{PlanResult, PlanningError};

type ProgressFn<'a> = Box<dyn FnMut(u8) + Send + 'a>;

/// Deadline, cancellation and progress hooks for one run.
pub struct RunControl<'a> {
    started: Instant,
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
    on_progress: Option<ProgressFn<'a>>,
    last_progress: Option<u8>,
}

impl<'a> RunControl<'a> {
    /// A run without limits.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            deadline: None,
            cancel: None,
            on_progress: None,
            last_progress: None,
        }
    }

    /// Stops the run once `timeout` has elapsed from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now().checked_add(timeout);
        Self { deadline, ..self }
    }

    /// Stops the run at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stops the run when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Calls `f` with the completion percentage whenever it increases.
    pub fn on_progress(mut self, f: impl FnMut(u8) + Send + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Time since the run was set up.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fails with `Cancelled` or `Timeout` when the run must stop.
    pub fn checkpoint(&self) -> PlanResult<()> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(PlanningError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(PlanningError::Timeout {
                elapsed: self.elapsed(),
            });
        }
        Ok(())
    }

    /// Reports `done` of `total` steps completed.
    pub fn report(&mut self, done: usize, total: usize) {
        let percent = if total == 0 {
            100
        } else {
            (done.min(total) * 100 / total) as u8
        };
        if self.last_progress.is_some_and(|last| percent <= last) {
            return;
        }
        self.last_progress = Some(percent);
        if let Some(f) = self.on_progress.as_mut() {
            f(percent);
        }
    }
}

impl Default for RunControl<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RunControl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunControl")
            .field("deadline", &self.deadline)
            .field("cancel", &self.cancel)
            .field("last_progress", &self.last_progress)
            .finish_non_exhaustive()
    }
}
