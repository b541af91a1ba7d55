//! Parsing for the dining dataset and its time strings.
//!
//! This module handles:
//! - The time normalizer: "14:30", "2:30 PM" and "02:30pm" all become the
//!   same [`ClockTime`]
//! - Reading the dataset JSON document, kept raw for the dataset endpoint
//!   and viewed as [`DiningData`] for everything else
//!
//! Rust concepts you'll learn here:
//! - Trying several parse strategies in order with `or_else`
//! - Error handling with `?` operator
//! - Working with file I/O

use crate::error::{DataLoadError, Result};
use crate::types::{ClockTime, DiningData};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 24-hour formats, tried first
const FORMATS_24H: &[&str] = &["%H:%M"];

/// 12-hour formats, tried when no 24-hour format matches
const FORMATS_12H: &[&str] = &["%I:%M %p", "%I:%M%p"];

/// Normalize a reservation time string.
///
/// Tries 24-hour `HH:MM` first, then 12-hour `hh:mm AM/PM`. Anything else
/// (including out-of-range values such as "25:99") is a
/// [`DataLoadError::TimeParse`] naming the input.
pub fn parse_clock_time(raw: &str) -> Result<ClockTime> {
    let trimmed = raw.trim();

    FORMATS_24H
        .iter()
        .chain(FORMATS_12H)
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .map(ClockTime)
        .ok_or_else(|| DataLoadError::TimeParse {
            value: raw.to_string(),
        })
}

/// Typed view of a raw dataset document.
///
/// Fields the document carries beyond the known ones are ignored here and
/// survive only in the raw [`Value`].
pub fn dataset_from_document(document: &Value) -> Result<DiningData> {
    Ok(DiningData::deserialize(document)?)
}

/// Parse a dataset document from a JSON string
pub fn parse_dataset(json: &str) -> Result<DiningData> {
    let document: Value = serde_json::from_str(json)?;
    dataset_from_document(&document)
}

/// Read the dataset file at `path` as a raw JSON document
pub fn read_document(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(serde_json::from_str(&contents)?)
}
