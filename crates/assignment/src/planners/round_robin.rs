//! Deterministic round-robin planner.
//!
//! The last resort of every assignment: cannot fail and always balances
//! table counts.

use async_trait::async_trait;
use data_loader::{ReservationRecord, WaiterId};

use crate::error::Result;
use crate::plan::Assignment;
use crate::traits::Planner;

/// Deals reservations out like cards.
///
/// ## Algorithm
/// 1. Sort waiter ids ascending (stable, fixed order)
/// 2. Reservation at extraction index `i` goes to the waiter at position
///    `i mod N`
///
/// Table counts therefore differ by at most one between any two waiters,
/// and the result is a pure function of the two input lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinPlanner;

impl RoundRobinPlanner {
    /// Synchronous form of the plan, used directly by the engine
    pub fn distribute(&self, waiters: &[WaiterId], records: &[ReservationRecord]) -> Assignment {
        let mut roster = waiters.to_vec();
        roster.sort_unstable();
        roster.dedup();

        let mut assignment = Assignment::for_waiters(&roster);
        if roster.is_empty() {
            return assignment;
        }

        for (i, record) in records.iter().enumerate() {
            let waiter = roster[i % roster.len()];
            assignment.push(waiter, record.clone());
        }
        assignment
    }
}

#[async_trait]
impl Planner for RoundRobinPlanner {
    fn name(&self) -> &str {
        "RoundRobinPlanner"
    }

    async fn plan(
        &self,
        waiters: &[WaiterId],
        records: &[ReservationRecord],
    ) -> Result<Assignment> {
        Ok(self.distribute(waiters, records))
    }
}
