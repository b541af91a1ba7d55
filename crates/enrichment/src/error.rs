//! Errors raised inside an enricher.
//!
//! These never leave the crate's public API: each enricher logs the error
//! and returns its documented default instead.

use llm_client::LlmClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmClientError),

    #[error("Unusable output: {0}")]
    InvalidOutput(String),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
