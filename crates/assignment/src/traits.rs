//! Core traits for assignment planning.
//!
//! This module defines the Planner trait that lets the engine try several
//! strategies in order.

use async_trait::async_trait;
use data_loader::{ReservationRecord, WaiterId};

use crate::error::Result;
use crate::plan::Assignment;

/// A strategy for distributing reservations across waiters.
///
/// ## Design Note
/// - `Send + Sync` allows planners to live in shared server state
/// - `waiters` arrives sorted ascending and deduplicated
/// - A planner may fail; the engine then moves on to the next one
#[async_trait]
pub trait Planner: Send + Sync {
    /// Returns the name of this planner (for logging/debugging)
    fn name(&self) -> &str;

    /// Produce an assignment covering every record exactly once.
    ///
    /// # Returns
    /// * `Ok(Assignment)` - Keys are a subset of `waiters`
    /// * `Err` - If this strategy could not produce a valid plan
    async fn plan(
        &self,
        waiters: &[WaiterId],
        records: &[ReservationRecord],
    ) -> Result<Assignment>;
}
