//! Core domain types for the fine-dining dataset.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (WaiterId)
//! - Newtypes with custom trait impls (ClockTime, FreeText)
//! - Serde attributes for tolerant deserialization
//! - HashMap side tables instead of back-pointers

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a waiter on the roster (small positive integer)
pub type WaiterId = u32;

/// Side table from diner name to the source diner.
///
/// Built during extraction and kept alongside the assignment so enrichment
/// can reach emails and reviews without the records carrying a pointer back
/// to their diner.
pub type DinerLookup = HashMap<String, Arc<Diner>>;

// =============================================================================
// Source Data
// =============================================================================

/// A single dish ordered as part of a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub item: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub price: f64,
}

/// A reservation exactly as it appears in the dataset.
///
/// `start_time` stays a raw string here; it only becomes a [`ClockTime`]
/// once the extractor normalizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub start_time: String,
    pub number_of_people: u32,
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Free-form text attached to a diner (an email thread, a review).
///
/// The dataset stores these either as plain strings or as small JSON
/// objects (subject, body, rating, ...). Both are accepted and kept as-is
/// so the dataset endpoint returns what was loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreeText(pub Value);

impl FreeText {
    /// Render the entry as plain text for use inside a prompt
    pub fn to_prompt_text(&self) -> String {
        render_value(&self.0)
    }
}

impl From<&str> for FreeText {
    fn from(text: &str) -> Self {
        FreeText(Value::String(text.to_string()))
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(key, inner)| format!("{}: {}", key, render_value(inner)))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A guest of the restaurant with everything we know about them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diner {
    pub name: String,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub emails: Vec<FreeText>,
    #[serde(default)]
    pub reviews: Vec<FreeText>,
}

impl Diner {
    /// All dietary tags across every order of every reservation, deduplicated
    /// in first-seen order
    pub fn dietary_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for order in self.reservations.iter().flat_map(|r| &r.orders) {
            for tag in &order.dietary_tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }
        tags
    }
}

/// Top-level dataset document: `{"diners": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiningData {
    #[serde(default)]
    pub diners: Vec<Diner>,
}

// =============================================================================
// Normalized Time
// =============================================================================

/// A wall-clock time of day, normalized from either accepted input format.
///
/// Rust concepts:
/// - Newtype over `chrono::NaiveTime` so ordering is by clock value
/// - `Display` renders the 12-hour staff-facing form ("2:30 PM")
/// - Serialized as 24-hour "HH:MM" so it parses back unambiguously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime(pub(crate) NaiveTime);

impl ClockTime {
    /// Build from hour (0-23) and minute, `None` when out of range
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(ClockTime)
    }

    /// 24-hour "HH:MM" form
    pub fn to_24_hour(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// 12-hour form without a leading zero on the hour ("2:30 PM")
    pub fn to_12_hour(&self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }
}

impl PartialOrd for ClockTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClockTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_12_hour())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_24_hour())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::parser::parse_clock_time(&raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Derived Records
// =============================================================================

/// One assignable reservation, flattened out of its diner.
///
/// This is the unit the assignment engine distributes. It deliberately
/// carries no reference to the source [`Diner`]; that linkage lives in the
/// [`DinerLookup`] side table produced by the same extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub diner_name: String,
    pub start_time: ClockTime,
    pub number_of_people: u32,
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Output of the reservation extractor
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Valid reservations in dataset order (diner order, then reservation order)
    pub records: Vec<ReservationRecord>,
    /// Diner name -> source diner, for enrichment lookups
    pub diners: DinerLookup,
    /// Number of reservations dropped because they failed validation
    pub skipped: usize,
}

/// Precomputed dataset totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCounts {
    pub diners: usize,
    pub reservations: usize,
    pub guests: u64,
}
