//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Order**: INPUT, PRIORITY
//! - **Time-based**: SPT, LPT
//! - **Constraint-based**: MCF (most constrained first)
//!
//! # Score Convention
//! All rules return lower scores for items that should be planned first.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haralick & Elliott (1980), "Increasing tree search efficiency for
//!   constraint satisfaction problems" (fail-first principle)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::PlanItem;

/// Rule names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingRule {
    /// Request order.
    InputOrder,
    /// Highest priority first.
    Priority,
    /// Shortest duration first.
    ShortestFirst,
    /// Longest duration first.
    LongestFirst,
    /// Fewest qualified resources first.
    MostConstrained,
}

impl OrderingRule {
    /// Instantiates the rule.
    pub fn rule(&self) -> Arc<dyn DispatchingRule> {
        match self {
            Self::InputOrder => Arc::new(InputOrder),
            Self::Priority => Arc::new(Priority),
            Self::ShortestFirst => Arc::new(Spt),
            Self::LongestFirst => Arc::new(Lpt),
            Self::MostConstrained => Arc::new(MostConstrained),
        }
    }
}

// ======================== Order rules ========================

/// Input order.
///
/// Keeps items in the order the caller submitted them.
#[derive(Debug, Clone, Copy)]
pub struct InputOrder;

impl DispatchingRule for InputOrder {
    fn name(&self) -> &'static str {
        "INPUT"
    }

    fn evaluate(&self, item: &PlanItem, context: &SchedulingContext) -> RuleScore {
        context
            .input_position
            .get(&item.id)
            .map(|&p| p as f64)
            .unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Input Order"
    }
}

/// Item priority.
///
/// Higher `PlanItem::priority` is planned first.
#[derive(Debug, Clone, Copy)]
pub struct Priority;

impl DispatchingRule for Priority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, item: &PlanItem, _context: &SchedulingContext) -> RuleScore {
        -(item.priority as f64)
    }

    fn description(&self) -> &'static str {
        "Highest Priority First"
    }
}

// ======================== Time-based rules ========================

/// Shortest Processing Time.
///
/// Short items first: places the most items when time is scarce.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, item: &PlanItem, _context: &SchedulingContext) -> RuleScore {
        item.duration.num_seconds() as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
///
/// Long items first, while large free stretches still exist.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, item: &PlanItem, _context: &SchedulingContext) -> RuleScore {
        -(item.duration.num_seconds() as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

// ======================== Constraint-based rules ========================

/// Most Constrained First.
///
/// Items that only few resources can serve go first, before flexible
/// items consume those resources' time.
#[derive(Debug, Clone, Copy)]
pub struct MostConstrained;

impl DispatchingRule for MostConstrained {
    fn name(&self) -> &'static str {
        "MCF"
    }

    fn evaluate(&self, item: &PlanItem, context: &SchedulingContext) -> RuleScore {
        context
            .qualified_resources
            .get(&item.id)
            .map(|&n| n as f64)
            .unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Most Constrained First"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::TimeDelta;

    fn item(id: &str, minutes: i64, priority: i32) -> PlanItem {
        PlanItem::new(id, TimeDelta::minutes(minutes), Location::new("Haarlem", 52.38, 4.64))
            .with_priority(priority)
    }

    #[test]
    fn test_input_order() {
        let mut ctx = SchedulingContext::default();
        ctx.input_position.insert("A".into(), 3);
        assert_eq!(InputOrder.evaluate(&item("A", 60, 0), &ctx), 3.0);
        assert_eq!(InputOrder.evaluate(&item("B", 60, 0), &ctx), f64::MAX);
    }

    #[test]
    fn test_priority() {
        let ctx = SchedulingContext::default();
        assert!(Priority.evaluate(&item("A", 60, 10), &ctx) < Priority.evaluate(&item("B", 60, 1), &ctx));
    }

    #[test]
    fn test_spt_lpt() {
        let ctx = SchedulingContext::default();
        let short = item("S", 30, 0);
        let long = item("L", 120, 0);
        assert!(Spt.evaluate(&short, &ctx) < Spt.evaluate(&long, &ctx));
        assert!(Lpt.evaluate(&long, &ctx) < Lpt.evaluate(&short, &ctx));
    }

    #[test]
    fn test_most_constrained() {
        let ctx = SchedulingContext::default()
            .with_qualified_resources("rare", 1)
            .with_qualified_resources("common", 5);
        assert!(
            MostConstrained.evaluate(&item("rare", 60, 0), &ctx)
                < MostConstrained.evaluate(&item("common", 60, 0), &ctx)
        );
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(OrderingRule::ShortestFirst.rule().name(), "SPT");
        assert_eq!(OrderingRule::MostConstrained.rule().description(), "Most Constrained First");
    }

    #[test]
    fn test_ordering_rule_serde() {
        let json = serde_json::to_string(&OrderingRule::MostConstrained).unwrap();
        assert_eq!(json, "\"most_constrained\"");
    }
}
