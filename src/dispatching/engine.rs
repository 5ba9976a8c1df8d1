//! Rule engine for multi-criteria item ordering.
//!
//! Rules are applied in sequence: the next rule only decides between items
//! the previous rules scored equal. Remaining ties keep input order (the
//! sort is stable), which makes Regular mode deterministic.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchingRule, OrderingRule, RuleScore, SchedulingContext};
use crate::models::PlanItem;

/// A composable rule engine for item prioritization.
///
/// # Example
/// ```
/// use u_planning::dispatching::{rules, RuleEngine, SchedulingContext};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Priority)
///     .with_rule(rules::Spt);
/// assert_eq!(engine.len(), 2);
/// assert!(engine.sort_indices(&[], &SchedulingContext::default()).is_empty());
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine (keeps input order).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Builds an engine from configured rule names.
    pub fn from_rules(names: &[OrderingRule]) -> Self {
        Self {
            rules: names.iter().map(OrderingRule::rule).collect(),
            ..Self::new()
        }
    }

    /// Appends a rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the engine has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sorts items by priority (planned-first first).
    ///
    /// Returns indices into the original slice.
    pub fn sort_indices(&self, items: &[PlanItem], context: &SchedulingContext) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..items.len()).collect();
        if self.rules.is_empty() {
            return indices;
        }

        // Score once per item and rule; stable sort preserves input order on ties.
        let scores: Vec<Vec<RuleScore>> = items.iter().map(|i| self.evaluate(i, context)).collect();
        indices.sort_by(|&a, &b| self.compare(&scores[a], &scores[b]));
        indices
    }

    /// Scores from each rule for one item.
    pub fn evaluate(&self, item: &PlanItem, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules.iter().map(|r| r.evaluate(item, context)).collect()
    }

    fn compare(&self, a: &[RuleScore], b: &[RuleScore]) -> Ordering {
        for (sa, sb) in a.iter().zip(b) {
            if (sa - sb).abs() > self.epsilon {
                return sa.partial_cmp(sb).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
