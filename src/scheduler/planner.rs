//! Greedy planner.
//!
//! # Algorithm (Regular mode)
//!
//! 1. Validate the request; reject it as a whole if anything is malformed.
//! 2. Order pending items with the rule engine (input order by default).
//! 3. For each item, ask every resource for its earliest candidate window.
//! 4. Pick the earliest start; ties go to the lowest resource id.
//! 5. Commit the window on that resource and move on. Items without any
//!    candidate are recorded as failed with a diagnosed reason.
//!
//! There is no backtracking: an early item may take time a later item
//! needed. The result is deterministic but not globally optimal.
//!
//! # Options mode
//!
//! The single pending item is matched against every resource and each
//! candidate window becomes an option. Per-resource candidates are merged
//! lazily by start, so `max_options` bounds the work done. Nothing is
//! committed.
//!
//! # Complexity
//! O(n * m * s) where n=items, m=resources, s=free segments per resource.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use tracing::{debug, info, warn};

use super::aggregator::ResultAggregator;
use super::control::RunControl;
use super::feasibility::{FeasibilityEngine, MergedCandidates};
use super::state::ResourceState;
use crate::config::PlannerConfig;
use crate::dispatching::{RuleEngine, SchedulingContext};
use crate::error::{PlanResult, PlanningError};
use crate::models::{PlanningMode, PlanningRequest, PlanningResult, Window};
use crate::validation::validate_request;

/// Options collected between two deadline checks.
const OPTIONS_PER_CHECKPOINT: usize = 1024;

/// Greedy earliest-start planner.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeDelta, Weekday};
/// use u_planning::models::{
///     Location, PlanItem, PlanningRequest, RecurrenceConstraint, Resource, Window,
/// };
/// use u_planning::scheduler::Planner;
///
/// let jan_1 = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let monday_9 = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let haarlem = Location::new("Haarlem", 52.377639, 4.642735);
///
/// let request = PlanningRequest::new(Window::new(jan_1, TimeDelta::days(31)))
///     .with_resource(
///         Resource::new("R1", haarlem.clone())
///             .with_qualification("Flux Capacitor")
///             .with_window(monday_9, TimeDelta::hours(8)),
///     )
///     .with_item(
///         PlanItem::new("P1", TimeDelta::hours(1), haarlem)
///             .with_qualification("Flux Capacitor")
///             .with_recurrence(RecurrenceConstraint::hours(Weekday::Mon, 8, 20)),
///     );
///
/// let result = Planner::new().plan(&request).unwrap();
/// assert_eq!(result.planned_items[0].window.start, monday_9);
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    rule_engine: RuleEngine,
}

impl Planner {
    /// Creates a planner with default configuration.
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    /// Creates a planner from configuration.
    ///
    /// The item order comes from `config.ordering`.
    pub fn with_config(config: PlannerConfig) -> Self {
        let rule_engine = RuleEngine::from_rules(&config.ordering);
        Self {
            config,
            rule_engine,
        }
    }

    /// Replaces the item ordering with a custom rule engine.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans a request without time limits.
    pub fn plan(&self, request: &PlanningRequest) -> PlanResult<PlanningResult> {
        self.plan_with(request, &mut RunControl::new())
    }

    /// Plans a request under the limits of `control`.
    pub fn plan_with(
        &self,
        request: &PlanningRequest,
        control: &mut RunControl<'_>,
    ) -> PlanResult<PlanningResult> {
        validate_request(request).map_err(|errors| {
            warn!(problems = errors.len(), "rejected invalid planning request");
            PlanningError::InvalidRequest(errors)
        })?;
        self.run(request, control)
    }

    /// Plans an already validated request.
    pub(crate) fn run(
        &self,
        request: &PlanningRequest,
        control: &mut RunControl<'_>,
    ) -> PlanResult<PlanningResult> {
        info!(
            mode = ?request.mode,
            resources = request.resources.len(),
            items = request.pending_plan_items.len(),
            "planning started"
        );

        let outcome = match request.mode {
            PlanningMode::Regular => self.plan_regular(request, control),
            PlanningMode::Options => self.plan_options(request, control),
        };

        match &outcome {
            Ok(result) => info!(
                planned = result.planned_count(),
                failed = result.failed_count(),
                elapsed_ms = control.elapsed().as_millis() as u64,
                "planning finished"
            ),
            Err(err @ (PlanningError::Timeout { .. } | PlanningError::Cancelled)) => {
                warn!(error = %err, "planning stopped")
            }
            Err(err) => warn!(error = %err, "planning failed"),
        }
        outcome
    }

    fn plan_regular(
        &self,
        request: &PlanningRequest,
        control: &mut RunControl<'_>,
    ) -> PlanResult<PlanningResult> {
        let items = &request.pending_plan_items;
        let context = SchedulingContext::from_request(request);
        let order = self.rule_engine.sort_indices(items, &context);

        let mut states = resource_states(request);
        let engine = FeasibilityEngine::new(&self.config);
        let mut aggregator = ResultAggregator::new(PlanningMode::Regular);

        control.report(0, order.len());
        for (done, &index) in order.iter().enumerate() {
            control.checkpoint()?;
            let item = &items[index];
            let profile = engine.profile(item, &request.planning_window);

            let mut best: Option<(Window, usize)> = None;
            for (slot, state) in states.iter().enumerate() {
                control.checkpoint()?;
                if let Some(window) = engine.earliest(&profile, state) {
                    // States are sorted by id, so the first of equal starts wins.
                    if best.map_or(true, |(b, _)| window.start < b.start) {
                        best = Some((window, slot));
                    }
                }
            }

            match best {
                Some((window, slot)) => {
                    let state = &mut states[slot];
                    debug!(
                        item = %item.id,
                        resource = %state.id(),
                        start = %window.start,
                        end = %window.end,
                        "item planned"
                    );
                    state.commit(window, item.location.clone());
                    aggregator.planned(item, window, state.id().clone())?;
                }
                None => {
                    let reason = engine.diagnose(&profile, &states);
                    debug!(item = %item.id, %reason, "item not planned");
                    aggregator.failed(item, reason)?;
                }
            }
            control.report(done + 1, order.len());
        }

        control.checkpoint()?;
        aggregator.finish(items)
    }

    fn plan_options(
        &self,
        request: &PlanningRequest,
        control: &mut RunControl<'_>,
    ) -> PlanResult<PlanningResult> {
        let items = &request.pending_plan_items;
        let [item] = items.as_slice() else {
            return Err(PlanningError::Internal(format!(
                "options mode needs one item, got {}",
                items.len()
            )));
        };

        let states = resource_states(request);
        let engine = FeasibilityEngine::new(&self.config);
        let profile = engine.profile(item, &request.planning_window);
        let mut aggregator = ResultAggregator::new(PlanningMode::Options);

        // One step per resource, one for the merge.
        let steps = states.len() + 1;
        control.report(0, steps);
        let mut sources = Vec::with_capacity(states.len());
        for (slot, state) in states.iter().enumerate() {
            control.checkpoint()?;
            sources.push(engine.candidates(&profile, state));
            control.report(slot + 1, steps);
        }

        let limit = self.config.max_options.unwrap_or(usize::MAX);
        let mut options: Vec<(Window, usize)> = Vec::new();
        for option in MergedCandidates::new(sources).take(limit) {
            if options.len() % OPTIONS_PER_CHECKPOINT == 0 {
                control.checkpoint()?;
            }
            options.push(option);
        }
        control.report(steps, steps);

        if options.is_empty() {
            let reason = engine.diagnose(&profile, &states);
            debug!(item = %item.id, %reason, "no options found");
            aggregator.failed(item, reason)?;
        } else {
            debug!(item = %item.id, options = options.len(), "options found");
            for (window, slot) in options {
                aggregator.planned(item, window, states[slot].id().clone())?;
            }
        }

        control.checkpoint()?;
        aggregator.finish(items)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh per-resource state, sorted by resource id.
fn resource_states(request: &PlanningRequest) -> Vec<ResourceState<'_>> {
    let mut states: Vec<ResourceState<'_>> = request.resources.iter().map(ResourceState::new).collect();
    states.sort_by(|a, b| a.id().cmp(b.id()));
    states
}
