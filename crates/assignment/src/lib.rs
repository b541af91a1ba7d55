//! Assignment of reservations to the waiters on duty.
//!
//! This crate provides:
//! - Planner trait and implementations (generative, round-robin)
//! - AssignmentEngine for chaining planners with a guaranteed fallback
//! - The Assignment type shared with the server
//!
//! ## Architecture
//! The engine processes a request in stages:
//! 1. The roster is sorted and deduplicated
//! 2. Planners are tried in order; their output is validated, never merged
//! 3. Round-robin covers every failure and is balanced by construction
//! 4. Each waiter's tables are sorted by start time
//!
//! ## Example Usage
//! ```ignore
//! use assignment::{AssignmentEngine, planners::GenerativePlanner};
//!
//! let engine = AssignmentEngine::new()
//!     .add_planner(GenerativePlanner::new(generator.clone()));
//!
//! let outcome = engine.assign(&[1, 2, 3], &extraction.records).await;
//! for (waiter, tables) in outcome.assignment.iter() {
//!     println!("waiter {waiter}: {} tables", tables.len());
//! }
//! ```

pub mod engine;
pub mod error;
pub mod plan;
pub mod planners;
pub mod traits;

// Re-export main types
pub use engine::{AssignmentEngine, AssignmentOutcome, PlanSource};
pub use error::PlanError;
pub use plan::Assignment;
pub use planners::{GenerativePlanner, RoundRobinPlanner};
pub use traits::Planner;
