//! The AssignmentEngine tries planners in order.
//!
//! This module provides the engine that chains planners using the builder
//! pattern, with the round-robin planner as a guaranteed last resort.

use data_loader::{ReservationRecord, WaiterId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::plan::Assignment;
use crate::planners::RoundRobinPlanner;
use crate::traits::Planner;

/// Which strategy produced an assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PlanSource {
    /// A configured planner produced a valid plan
    Planner { name: String },
    /// Every configured planner failed (or none was configured)
    Fallback { reason: String },
}

impl PlanSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, PlanSource::Fallback { .. })
    }
}

/// Result of one [`AssignmentEngine::assign`] call
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub assignment: Assignment,
    pub source: PlanSource,
}

/// Chains planners together; assignment always succeeds.
///
/// ## Usage
/// ```ignore
/// let engine = AssignmentEngine::new()
///     .add_planner(GenerativePlanner::new(generator));
///
/// let outcome = engine.assign(&[1, 2, 3], &extraction.records).await;
/// ```
pub struct AssignmentEngine {
    planners: Vec<Box<dyn Planner>>,
    fallback: RoundRobinPlanner,
}

impl AssignmentEngine {
    /// Create an engine with no planners (pure round-robin).
    pub fn new() -> Self {
        Self {
            planners: Vec::new(),
            fallback: RoundRobinPlanner,
        }
    }

    /// Add a planner to try before the fallback (builder pattern).
    pub fn add_planner(mut self, planner: impl Planner + 'static) -> Self {
        self.planners.push(Box::new(planner));
        self
    }

    /// Distribute `records` across `waiter_ids`.
    ///
    /// ## Algorithm
    /// 1. Sort and deduplicate the roster
    /// 2. Try each planner in order; the first valid plan wins
    /// 3. Otherwise deal the records round-robin
    /// 4. Sort each waiter's tables by start time
    ///
    /// An empty roster yields an empty assignment. With no records every
    /// waiter gets an empty list and no planner is consulted.
    pub async fn assign(
        &self,
        waiter_ids: &[WaiterId],
        records: &[ReservationRecord],
    ) -> AssignmentOutcome {
        let mut roster = waiter_ids.to_vec();
        roster.sort_unstable();
        roster.dedup();

        let (mut assignment, source) = if roster.is_empty() || records.is_empty() {
            (
                self.fallback.distribute(&roster, records),
                PlanSource::Fallback {
                    reason: "nothing to plan".to_string(),
                },
            )
        } else {
            self.plan_with_fallback(&roster, records).await
        };

        assignment.sort_by_start_time();

        info!(
            "Assigned {} tables across {} waiters ({:?})",
            assignment.total_tables(),
            roster.len(),
            source
        );
        AssignmentOutcome { assignment, source }
    }

    async fn plan_with_fallback(
        &self,
        roster: &[WaiterId],
        records: &[ReservationRecord],
    ) -> (Assignment, PlanSource) {
        let mut last_failure = "no planner configured".to_string();

        for planner in &self.planners {
            debug!(
                "Trying planner: {} ({} waiters, {} reservations)",
                planner.name(),
                roster.len(),
                records.len()
            );
            match planner.plan(roster, records).await {
                Ok(assignment) => {
                    return (
                        assignment,
                        PlanSource::Planner {
                            name: planner.name().to_string(),
                        },
                    );
                }
                Err(e) => {
                    warn!("Planner {} failed: {}", planner.name(), e);
                    last_failure = format!("{}: {}", planner.name(), e);
                }
            }
        }

        (
            self.fallback.distribute(roster, records),
            PlanSource::Fallback {
                reason: last_failure,
            },
        )
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new()
    }
}
