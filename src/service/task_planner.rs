//! Asynchronous planning tasks.
//!
//! [`TaskPlanner`] runs the synchronous [`Planner`] on Tokio's blocking pool
//! so callers on the async runtime are never blocked. Each submission gets
//! its own [`PlanningHandle`] with a progress stream and a cancellation
//! token. Requests share no mutable state; concurrent tasks are isolated.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info_span, instrument, warn, Instrument, Span};

use super::progress::{ProgressReporter, ProgressUpdate};
use crate::config::PlannerConfig;
use crate::error::{PlanResult, PlanningError};
use crate::models::{PlanningRequest, PlanningTask, TaskId};
use crate::scheduler::{Planner, RunControl};
use crate::validation::validate_request;

/// Per-submission limits.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Deadline measured from submission.
    pub timeout: Option<Duration>,
    /// Minimum spacing of progress updates. Falls back to the planner's
    /// configured interval.
    pub progress_interval: Option<Duration>,
    /// External cancellation.
    pub cancel: Option<CancellationToken>,
}

impl PlanOptions {
    /// Sets the deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the progress interval.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Links the task to an external cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Handle of a submitted planning task.
///
/// Dropping the handle without waiting cancels the task.
#[derive(Debug)]
pub struct PlanningHandle {
    task_id: TaskId,
    updates: mpsc::Receiver<ProgressUpdate>,
    cancel: CancellationToken,
    join: JoinHandle<PlanningTask>,
    guard: DropGuard,
}

impl PlanningHandle {
    /// Identifier of the task.
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Requests cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Next progress update; `None` once the terminal update was delivered.
    pub async fn next_update(&mut self) -> Option<ProgressUpdate> {
        self.updates.recv().await
    }

    /// Waits for the task to finish, discarding undelivered updates.
    pub async fn wait(self) -> PlanningTask {
        let Self {
            task_id,
            updates,
            join,
            guard,
            ..
        } = self;
        drop(updates);

        let joined = join.await;
        let _ = guard.disarm();
        match joined {
            Ok(task) => task,
            Err(err) => {
                error!(task_id = %task_id, error = %err, "planning task aborted");
                PlanningTask::rejected(task_id, &PlanningError::Internal(err.to_string()))
            }
        }
    }
}

/// Async facade over [`Planner`].
///
/// # Example
///
/// ```no_run
/// # async fn demo(request: u_planning::models::PlanningRequest) {
/// use std::time::Duration;
/// use u_planning::service::{PlanOptions, TaskPlanner};
///
/// let planner = TaskPlanner::default();
/// let mut handle = planner
///     .plan_with_progress(request, PlanOptions::default().with_timeout(Duration::from_secs(5)))
///     .expect("valid request");
/// while let Some(update) = handle.next_update().await {
///     println!("{}% {}", update.progress, update.status);
/// }
/// let task = handle.wait().await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TaskPlanner {
    planner: Arc<Planner>,
}

impl TaskPlanner {
    /// Creates a task planner from configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self::from_planner(Planner::with_config(config))
    }

    /// Wraps a configured planner.
    pub fn from_planner(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PlannerConfig {
        self.planner.config()
    }

    /// Plans a request without limits and waits for the outcome.
    pub async fn plan(&self, request: PlanningRequest) -> PlanningTask {
        self.plan_with(request, PlanOptions::default()).await
    }

    /// Plans a request under `options` and waits for the outcome.
    ///
    /// Invalid requests come back as a task in `Error` that never ran.
    #[instrument(skip_all, fields(mode = ?request.mode, items = request.pending_plan_items.len()))]
    pub async fn plan_with(&self, request: PlanningRequest, options: PlanOptions) -> PlanningTask {
        match self.plan_with_progress(request, options) {
            Ok(handle) => handle.wait().await,
            Err(err) => PlanningTask::rejected(TaskId::generate(), &err),
        }
    }

    /// Submits a request and returns immediately.
    ///
    /// Validation happens here: an invalid request is rejected before any
    /// task is spawned. Must be called from within a Tokio runtime.
    ///
    /// An external token in `options` cancels the task; the task never
    /// cancels the external token.
    pub fn plan_with_progress(
        &self,
        request: PlanningRequest,
        options: PlanOptions,
    ) -> PlanResult<PlanningHandle> {
        validate_request(&request).map_err(|errors| {
            warn!(problems = errors.len(), "rejected invalid planning request");
            PlanningError::InvalidRequest(errors)
        })?;

        let task_id = TaskId::generate();
        let cancel = options
            .cancel
            .map_or_else(CancellationToken::new, |token| token.child_token());
        let limits = Limits {
            deadline: options.timeout.and_then(|t| Instant::now().checked_add(t)),
            cancel: cancel.clone(),
            progress_interval: options
                .progress_interval
                .unwrap_or_else(|| self.planner.config().progress_interval()),
        };
        let (tx, updates) = mpsc::channel(self.planner.config().progress_buffer.max(1));

        let span = info_span!("planning_task", task_id = %task_id);
        let join = tokio::spawn(
            run_task(Arc::clone(&self.planner), request, task_id.clone(), limits, tx).instrument(span),
        );
        debug!(task_id = %task_id, "planning task submitted");

        Ok(PlanningHandle {
            task_id,
            updates,
            guard: cancel.clone().drop_guard(),
            cancel,
            join,
        })
    }
}

impl Default for TaskPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

struct Limits {
    deadline: Option<Instant>,
    cancel: CancellationToken,
    progress_interval: Duration,
}

async fn run_task(
    planner: Arc<Planner>,
    request: PlanningRequest,
    task_id: TaskId,
    limits: Limits,
    tx: mpsc::Sender<ProgressUpdate>,
) -> PlanningTask {
    let mut task = PlanningTask::new(task_id.clone());
    let latest = Arc::new(AtomicU8::new(0));

    let outcome = match task.start() {
        Ok(()) => {
            let reporter = ProgressReporter::new(
                task_id,
                tx.clone(),
                limits.progress_interval,
                Arc::clone(&latest),
            );
            let span = Span::current();
            spawn_blocking(move || {
                let _entered = span.enter();
                let mut reporter = reporter;
                let mut control = RunControl::new()
                    .with_cancellation(limits.cancel)
                    .on_progress(|p| reporter.report(p));
                if let Some(deadline) = limits.deadline {
                    control = control.with_deadline(deadline);
                }
                planner.run(&request, &mut control)
            })
            .await
            .unwrap_or_else(|err| Err(PlanningError::Internal(format!("planning worker failed: {err}"))))
        }
        Err(err) => Err(err),
    };

    task.set_progress(latest.load(Ordering::Relaxed));
    let recorded = match outcome {
        Ok(result) => task.succeed(result),
        Err(err) => task.fail(&err),
    };
    if let Err(err) = recorded {
        error!(error = %err, "could not record task outcome");
    }

    if tx.send(ProgressUpdate::from(&task)).await.is_err() {
        debug!("progress receiver dropped before completion");
    }
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        FaultKind, Location, PlanItem, PlanningMode, PlanningTaskStatus, RecurrenceConstraint,
        Resource, Window,
    };
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Weekday};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn haarlem() -> Location {
        Location::new("Haarlem", 52.377639, 4.642735)
    }

    fn flux_request() -> PlanningRequest {
        PlanningRequest::new(Window::new(at(1, 0), TimeDelta::days(31)))
            .with_resource(
                Resource::new("R1", haarlem())
                    .with_qualification("Flux Capacitor")
                    .with_window(at(3, 9), TimeDelta::hours(8)),
            )
            .with_item(
                PlanItem::new("P1", TimeDelta::hours(1), haarlem())
                    .with_qualification("Flux Capacitor")
                    .with_recurrence(RecurrenceConstraint::hours(Weekday::Mon, 8, 20)),
            )
    }

    fn large_request() -> PlanningRequest {
        let mut request = PlanningRequest::new(Window::new(at(1, 0), TimeDelta::days(31)));
        for r in 0..100 {
            let mut resource = Resource::new(format!("R{r:03}"), haarlem());
            for day in 1..=30 {
                resource = resource.with_window(at(day, 8), TimeDelta::hours(10));
            }
            request = request.with_resource(resource);
        }
        for i in 0..5000 {
            request = request.with_item(PlanItem::new(
                format!("P{i}"),
                TimeDelta::minutes(15 + (i % 4) * 15),
                haarlem(),
            ));
        }
        request
    }

    #[tokio::test]
    async fn test_plan_success() {
        let task = TaskPlanner::default().plan(flux_request()).await;

        assert_eq!(task.status, PlanningTaskStatus::Success);
        assert_eq!(task.progress, 100);
        assert!(task.fault.is_none());
        let planning = task.planning.unwrap();
        assert_eq!(planning.planned_items[0].window.start, at(3, 9));
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_synchronously() {
        let request = flux_request()
            .with_item(PlanItem::new("P2", TimeDelta::hours(1), haarlem()))
            .with_mode(PlanningMode::Options);
        let planner = TaskPlanner::default();

        let err = planner
            .plan_with_progress(request.clone(), PlanOptions::default())
            .unwrap_err();
        assert!(matches!(err, PlanningError::InvalidRequest(_)));

        let task = planner.plan(request).await;
        assert_eq!(task.status, PlanningTaskStatus::Error);
        assert_eq!(task.fault.unwrap().kind, FaultKind::InvalidRequest);
        assert!(task.planning.is_none());
    }

    #[tokio::test]
    async fn test_timeout_discards_partial_result() {
        let options = PlanOptions::default().with_timeout(Duration::from_millis(1));
        let task = TaskPlanner::default().plan_with(large_request(), options).await;

        assert_eq!(task.status, PlanningTaskStatus::Error);
        assert_eq!(task.fault.as_ref().unwrap().kind, FaultKind::Timeout);
        assert!(task.planning.is_none());
    }

    #[tokio::test]
    async fn test_cancel_through_handle() {
        let handle = TaskPlanner::default()
            .plan_with_progress(large_request(), PlanOptions::default())
            .unwrap();
        handle.cancel();
        let task = handle.wait().await;

        assert_eq!(task.status, PlanningTaskStatus::Error);
        assert_eq!(task.fault.unwrap().kind, FaultKind::Cancelled);
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels_task() {
        let external = CancellationToken::new();
        let options = PlanOptions::default().with_cancellation(external.clone());
        let handle = TaskPlanner::default()
            .plan_with_progress(large_request(), options)
            .unwrap();
        let token = handle.cancel.clone();

        drop(handle);
        assert!(token.is_cancelled());
        assert!(!external.is_cancelled());
    }

    #[tokio::test]
    async fn test_waiting_does_not_cancel() {
        let handle = TaskPlanner::default()
            .plan_with_progress(flux_request(), PlanOptions::default())
            .unwrap();
        let token = handle.cancel.clone();

        let task = handle.wait().await;
        assert_eq!(task.status, PlanningTaskStatus::Success);
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn test_external_cancellation_token() {
        let token = CancellationToken::new();
        token.cancel();
        let options = PlanOptions::default().with_cancellation(token);
        let task = TaskPlanner::default().plan_with(flux_request(), options).await;
        assert_eq!(task.fault.unwrap().kind, FaultKind::Cancelled);
    }

    #[tokio::test]
    async fn test_final_update_is_terminal() {
        let mut request = flux_request();
        for i in 2..=20 {
            request = request.with_item(PlanItem::new(format!("P{i}"), TimeDelta::minutes(15), haarlem()));
        }
        let options = PlanOptions::default().with_progress_interval(Duration::ZERO);
        let mut handle = TaskPlanner::default().plan_with_progress(request, options).unwrap();
        let task_id = handle.task_id().clone();

        let mut updates = Vec::new();
        while let Some(update) = handle.next_update().await {
            updates.push(update);
        }
        let task = handle.wait().await;

        let last = updates.last().unwrap();
        assert_eq!(last.status, PlanningTaskStatus::Success);
        assert_eq!(last.progress, 100);
        assert!(updates.iter().all(|u| u.task_id == task_id));
        assert!(updates[..updates.len() - 1]
            .iter()
            .all(|u| u.status == PlanningTaskStatus::Running));
        assert!(updates.windows(2).all(|w| w[0].progress <= w[1].progress));
        assert_eq!(task.status, PlanningTaskStatus::Success);
    }

    #[tokio::test]
    async fn test_error_update_is_terminal() {
        let options = PlanOptions::default().with_timeout(Duration::ZERO);
        let mut handle = TaskPlanner::default().plan_with_progress(flux_request(), options).unwrap();

        let mut last = None;
        while let Some(update) = handle.next_update().await {
            last = Some(update);
        }
        assert_eq!(last.unwrap().status, PlanningTaskStatus::Error);
        assert_eq!(handle.wait().await.fault.unwrap().kind, FaultKind::Timeout);
    }

    #[tokio::test]
    async fn test_concurrent_tasks_are_isolated() {
        let planner = TaskPlanner::default();
        let expected = Planner::new().plan(&flux_request()).unwrap();

        let (a, b) = tokio::join!(planner.plan(flux_request()), planner.plan(flux_request()));
        assert_ne!(a.id, b.id);
        assert_eq!(a.planning.unwrap(), expected);
        assert_eq!(b.planning.unwrap(), expected);
    }
}
