//! Error types for the data-loader crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - `#[from]` conversions so `?` works on I/O and JSON errors
//! - Error messages that name the offending input

use thiserror::Error;

/// Errors that can occur while loading the dining dataset or normalizing
/// the values inside it.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Dataset file could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The dataset document is not valid JSON or has the wrong shape
    #[error("Malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// A reservation time matched neither accepted format
    ///
    /// Accepted formats are 24-hour `HH:MM` and 12-hour `hh:mm AM/PM`.
    #[error("Unrecognized time '{value}': expected HH:MM or hh:mm AM/PM")]
    TimeParse { value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
