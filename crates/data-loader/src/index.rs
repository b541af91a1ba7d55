//! DiningIndex loading and reservation extraction.
//!
//! This module owns the dataset for the service period and turns it into
//! assignable [`ReservationRecord`]s:
//! - Load the dataset once at startup (missing file = empty dataset)
//! - Flatten diners into records, normalizing each start time
//! - Build the diner side table used by enrichment
//!
//! Rust concepts you'll learn:
//! - Using Rayon for order-preserving parallel maps
//! - Per-item error recovery instead of failing the whole batch
//! - Entry API for HashMap

use crate::error::Result;
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable dataset for one service period.
///
/// Everything downstream (assignment, enrichment, the dataset endpoint)
/// reads from a shared `Arc<DiningIndex>`. The document is kept exactly as
/// loaded next to its typed view.
#[derive(Debug)]
pub struct DiningIndex {
    document: Value,
    data: DiningData,
    /// Position of each diner in `data.diners`, first occurrence wins
    by_name: HashMap<String, usize>,
}

impl DiningIndex {
    /// Build an index over already-parsed data; the document is its
    /// serialized form
    pub fn new(data: DiningData) -> Self {
        let document = serde_json::to_value(&data).unwrap_or_default();
        Self::with_document(document, data)
    }

    /// Build an index over a raw dataset document, keeping it verbatim
    pub fn from_document(document: Value) -> Result<Self> {
        let data = parser::dataset_from_document(&document)?;
        Ok(Self::with_document(document, data))
    }

    fn with_document(document: Value, data: DiningData) -> Self {
        let mut by_name = HashMap::new();
        for (position, diner) in data.diners.iter().enumerate() {
            match by_name.entry(diner.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(_) => {
                    warn!("Duplicate diner name '{}' in dataset, keeping first entry", diner.name);
                }
            }
        }
        Self {
            document,
            data,
            by_name,
        }
    }

    /// Load the dataset from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading dining dataset from {}", path.display());
        let index = Self::from_document(parser::read_document(path)?)?;
        let counts = index.counts();
        info!(
            "Loaded {} diners with {} reservations ({} guests)",
            counts.diners, counts.reservations, counts.guests
        );
        Ok(index)
    }

    /// Load the dataset, falling back to an empty one when the file is
    /// missing or malformed.
    ///
    /// A broken dataset must not keep the service from starting; it simply
    /// has nothing to assign.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(index) => index,
            Err(e) => {
                warn!("Could not load dataset from {}: {}. Starting with no diners", path.display(), e);
                Self::default()
            }
        }
    }

    /// The dataset document as loaded, including fields the typed view
    /// does not model
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// All diners in dataset order
    pub fn diners(&self) -> &[Diner] {
        &self.data.diners
    }

    /// Look up a diner by exact name
    pub fn get_diner(&self, name: &str) -> Option<&Diner> {
        self.by_name
            .get(name)
            .and_then(|&position| self.data.diners.get(position))
    }

    /// Dataset totals (diners, reservations, guests)
    pub fn counts(&self) -> DatasetCounts {
        let reservations = self.data.diners.iter().map(|d| d.reservations.len()).sum();
        let guests = self
            .data
            .diners
            .iter()
            .flat_map(|d| &d.reservations)
            .map(|r| u64::from(r.number_of_people))
            .sum();
        DatasetCounts {
            diners: self.data.diners.len(),
            reservations,
            guests,
        }
    }

    /// Flatten the dataset into assignable reservation records.
    ///
    /// ## Algorithm
    /// 1. For each diner (in parallel, order preserved), normalize every
    ///    reservation's start time
    /// 2. Reservations with an unparseable time or an empty party are
    ///    logged and skipped; the rest become records
    /// 3. Concatenate in dataset order and build the diner side table
    pub fn extract_reservations(&self) -> Extraction {
        // Rayon's indexed collect keeps the original diner order
        let per_diner: Vec<(Vec<ReservationRecord>, usize)> = self
            .data
            .diners
            .par_iter()
            .map(extract_diner)
            .collect();

        let mut extraction = Extraction::default();
        for ((records, skipped), diner) in per_diner.into_iter().zip(&self.data.diners) {
            extraction.skipped += skipped;
            if records.is_empty() {
                continue;
            }
            extraction.records.extend(records);
            extraction
                .diners
                .entry(diner.name.clone())
                .or_insert_with(|| Arc::new(diner.clone()));
        }

        debug!(
            "Extracted {} reservation records ({} skipped) for {} diners",
            extraction.records.len(),
            extraction.skipped,
            extraction.diners.len()
        );
        extraction
    }
}

impl Default for DiningIndex {
    fn default() -> Self {
        Self::new(DiningData::default())
    }
}

/// Extract one diner's records, returning them with the number skipped
fn extract_diner(diner: &Diner) -> (Vec<ReservationRecord>, usize) {
    let mut records = Vec::with_capacity(diner.reservations.len());
    let mut skipped = 0;

    for reservation in &diner.reservations {
        let start_time = match parser::parse_clock_time(&reservation.start_time) {
            Ok(time) => time,
            Err(e) => {
                warn!("Skipping reservation for '{}': {}", diner.name, e);
                skipped += 1;
                continue;
            }
        };
        if reservation.number_of_people == 0 {
            warn!(
                "Skipping reservation for '{}' at {}: party size must be positive",
                diner.name, reservation.start_time
            );
            skipped += 1;
            continue;
        }

        records.push(ReservationRecord {
            diner_name: diner.name.clone(),
            start_time,
            number_of_people: reservation.number_of_people,
            orders: reservation.orders.clone(),
        });
    }

    (records, skipped)
}
