//! Dispatching rules for item ordering.
//!
//! Regular mode is greedy: items are placed one at a time and earlier items
//! get first pick of the free time. The order therefore shapes the outcome.
//! A [`RuleEngine`] sorts pending items with a chain of rules; ties fall
//! through to the next rule and finally to input order, so the resulting
//! order is always deterministic.
//!
//! # Usage
//!
//! ```
//! use u_planning::dispatching::{rules, RuleEngine};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Priority)
//!     .with_rule(rules::MostConstrained);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::RuleEngine;
pub use rules::OrderingRule;

use crate::models::PlanItem;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = planned first.
pub type RuleScore = f64;

/// A dispatching rule that evaluates item priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for items that should be planned first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT").
    fn name(&self) -> &'static str;

    /// Evaluates an item given the request context.
    fn evaluate(&self, item: &PlanItem, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
