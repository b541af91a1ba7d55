//! Planner implementations for the assignment engine.

pub mod generative;
pub mod round_robin;

// Re-export for convenience
pub use generative::GenerativePlanner;
pub use round_robin::RoundRobinPlanner;
