//! Derived-Data Cache
//!
//! Four memo tables sit in front of the enrichers:
//!
//! | table | key | value |
//! |---|---|---|
//! | allergies | diner name | allergy line |
//! | special events | diner name | [`SpecialEvent`] |
//! | preferences | diner name | preference list |
//! | summaries | waiter id | briefing text |
//!
//! ## Algorithm
//! A lookup returns the stored value when present. Otherwise the enricher
//! runs once and its result (or its default, since enrichers never fail) is
//! stored and returned. [`DerivedCache::clear_all`] empties every table at
//! once; there is no per-entry invalidation.
//!
//! [`DerivedCache::special_events_for`] fills the special-event table for a
//! batch of diners, running the missing detections concurrently so a cold
//! batch costs about one generation round trip instead of one per diner.
//!
//! ## Design Note
//! Methods take `&mut self`. The owner keeps the cache behind the same async
//! lock as the assignment, so the check and the populate happen under one
//! guard and a concurrent attendance change cannot interleave with them.
//!
//! ## Example Usage
//!
//! ```ignore
//! let enrichers = Enrichers::new(generator);
//! let mut cache = DerivedCache::new();
//! let allergies = cache.allergies_for(&diner, &enrichers).await;
//! let again = cache.allergies_for(&diner, &enrichers).await; // no second call
//! cache.clear_all();
//! ```

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::hash::Hash;

use data_loader::{Diner, ReservationRecord, WaiterId};
use futures::future::join_all;
use llm_client::SharedGenerator;
use tracing::debug;

use crate::allergies::AllergyExtractor;
use crate::preferences::PreferenceExtractor;
use crate::special_events::{EventDetector, SpecialEvent};
use crate::summary::SummaryWriter;

// ============================================================================
// Memo table
// ============================================================================

/// A map whose values are computed on first lookup
#[derive(Debug, Clone)]
pub struct MemoTable<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for MemoTable<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Clone> MemoTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Stored value for `key`, computing and storing it first if absent
    pub async fn get_or_insert_with<F, Fut>(&mut self, key: K, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.entries.get(&key) {
            return value.clone();
        }
        let value = compute().await;
        self.entries.insert(key, value.clone());
        value
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Enrichers
// ============================================================================

/// The four enrichers, sharing one generator
pub struct Enrichers {
    pub allergies: AllergyExtractor,
    pub special_events: EventDetector,
    pub preferences: PreferenceExtractor,
    pub summaries: SummaryWriter,
}

impl Enrichers {
    pub fn new(generator: SharedGenerator) -> Self {
        Self {
            allergies: AllergyExtractor::new(generator.clone()),
            special_events: EventDetector::new(generator.clone()),
            preferences: PreferenceExtractor::new(generator.clone()),
            summaries: SummaryWriter::new(generator),
        }
    }
}

// ============================================================================
// Derived cache
// ============================================================================

/// Entry counts per table, mostly for logs and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheSizes {
    pub allergies: usize,
    pub special_events: usize,
    pub preferences: usize,
    pub summaries: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DerivedCache {
    allergies: MemoTable<String, String>,
    special_events: MemoTable<String, SpecialEvent>,
    preferences: MemoTable<String, Vec<String>>,
    summaries: MemoTable<WaiterId, String>,
}

impl DerivedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn allergies_for(&mut self, diner: &Diner, enrichers: &Enrichers) -> String {
        self.allergies
            .get_or_insert_with(diner.name.clone(), || enrichers.allergies.extract(diner))
            .await
    }

    pub async fn special_event_for(&mut self, diner: &Diner, enrichers: &Enrichers) -> SpecialEvent {
        self.special_events
            .get_or_insert_with(diner.name.clone(), || enrichers.special_events.detect(diner))
            .await
    }

    /// Special events for `diners`, in the same order.
    ///
    /// Diners without a stored event are detected concurrently, each name
    /// at most once, and every result is stored before returning.
    pub async fn special_events_for(
        &mut self,
        diners: &[&Diner],
        enrichers: &Enrichers,
    ) -> Vec<SpecialEvent> {
        let mut seen = HashSet::new();
        let missing: Vec<&Diner> = diners
            .iter()
            .copied()
            .filter(|diner| self.special_events.get(&diner.name).is_none())
            .filter(|diner| seen.insert(diner.name.as_str()))
            .collect();

        if !missing.is_empty() {
            debug!("Detecting special events for {} diners", missing.len());
            let detected =
                join_all(missing.iter().map(|diner| enrichers.special_events.detect(diner))).await;
            for (diner, event) in missing.into_iter().zip(detected) {
                self.special_events.insert(diner.name.clone(), event);
            }
        }

        diners
            .iter()
            .map(|diner| {
                self.special_events
                    .get(&diner.name)
                    .cloned()
                    .unwrap_or_else(SpecialEvent::none)
            })
            .collect()
    }

    pub async fn preferences_for(&mut self, diner: &Diner, enrichers: &Enrichers) -> Vec<String> {
        self.preferences
            .get_or_insert_with(diner.name.clone(), || enrichers.preferences.extract(diner))
            .await
    }

    /// Briefing for one waiter; `tables` must already be in seating order
    pub async fn summary_for(
        &mut self,
        waiter_id: WaiterId,
        waiter_name: &str,
        tables: &[ReservationRecord],
        enrichers: &Enrichers,
    ) -> String {
        self.summaries
            .get_or_insert_with(waiter_id, || enrichers.summaries.write(waiter_name, tables))
            .await
    }

    /// Allergy line if it was already computed; never triggers generation
    pub fn cached_allergies(&self, diner_name: &str) -> Option<&str> {
        self.allergies.get(&diner_name.to_string()).map(String::as_str)
    }

    pub fn clear_all(&mut self) {
        let before = self.sizes();
        self.allergies.clear();
        self.special_events.clear();
        self.preferences.clear();
        self.summaries.clear();
        debug!(?before, "Cleared derived cache");
    }

    pub fn sizes(&self) -> CacheSizes {
        CacheSizes {
            allergies: self.allergies.len(),
            special_events: self.special_events.len(),
            preferences: self.preferences.len(),
            summaries: self.summaries.len(),
        }
    }
}
