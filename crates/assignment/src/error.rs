//! Error types for planning.
//!
//! A [`PlanError`] never escapes the [`AssignmentEngine`](crate::AssignmentEngine):
//! it only decides that the next planner in the chain gets a turn.

use llm_client::LlmClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// The generation call itself failed or timed out
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmClientError),

    /// The output parsed but does not describe a valid assignment
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
