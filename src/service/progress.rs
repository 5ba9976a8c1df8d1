//! Throttled progress notifications.
//!
//! Running updates are best-effort: they are spaced by a minimum interval
//! and dropped when the channel is full. The terminal update is sent by the
//! task itself and always waits for room.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

use crate::models::{PlanningTask, PlanningTaskStatus, TaskId};

/// Snapshot of a planning task's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Task the update belongs to.
    pub task_id: TaskId,
    /// Percentage of pending items processed.
    pub progress: u8,
    /// Task status at the time of the update.
    pub status: PlanningTaskStatus,
}

impl From<&PlanningTask> for ProgressUpdate {
    fn from(task: &PlanningTask) -> Self {
        Self {
            task_id: task.id.clone(),
            progress: task.progress,
            status: task.status,
        }
    }
}

/// Sends `Running` updates from the planning worker.
#[derive(Debug)]
pub(crate) struct ProgressReporter {
    task_id: TaskId,
    tx: mpsc::Sender<ProgressUpdate>,
    min_interval: Duration,
    last_sent: Option<(Instant, u8)>,
    latest: Arc<AtomicU8>,
}

impl ProgressReporter {
    pub(crate) fn new(
        task_id: TaskId,
        tx: mpsc::Sender<ProgressUpdate>,
        min_interval: Duration,
        latest: Arc<AtomicU8>,
    ) -> Self {
        Self {
            task_id,
            tx,
            min_interval,
            last_sent: None,
            latest,
        }
    }

    /// Records `progress` and forwards it unless throttled.
    pub(crate) fn report(&mut self, progress: u8) {
        self.latest.fetch_max(progress, Ordering::Relaxed);

        let now = Instant::now();
        if let Some((at, sent)) = self.last_sent {
            if progress <= sent || now.duration_since(at) < self.min_interval {
                return;
            }
        }

        let update = ProgressUpdate {
            task_id: self.task_id.clone(),
            progress,
            status: PlanningTaskStatus::Running,
        };
        match self.tx.try_send(update) {
            Ok(()) => self.last_sent = Some((now, progress)),
            Err(TrySendError::Full(_)) => trace!(progress, "progress update dropped"),
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
