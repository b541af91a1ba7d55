//! # Floor Orchestrator
//!
//! This module coordinates everything behind the query surface:
//! 1. Extract reservation records from the dataset
//! 2. Assign them to the present waiters (generative plan or round-robin)
//! 3. Install the assignment and clear the derived cache
//! 4. Answer reads, computing derived values on first use
//!
//! ## Locking
//!
//! Two async mutexes:
//! - `write_gate` serializes attendance updates. The (possibly slow)
//!   assignment is computed while holding only this gate.
//! - `state` guards [`SessionState`]. The swap of roster, assignment, diner
//!   table and cache happens in one critical section, and every read that
//!   may populate the cache holds it across the generation call.
//!
//! A reader therefore sees either the complete old state or the complete
//! new one, and a cache entry can never be written for an assignment that
//! has already been replaced.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use assignment::{AssignmentEngine, GenerativePlanner, PlanSource};
use data_loader::{Diner, DinerLookup, DiningIndex, WaiterId};
use enrichment::{CacheSizes, Enrichers};
use llm_client::SharedGenerator;

use crate::error::{ServiceError, ServiceResult};
use crate::state::SessionState;
use crate::views::{
    Attendance, DailyStats, DinerAllergies, DinerPreferences, TableView, WaiterAssignment,
};
use crate::waiters::waiter_name;

pub struct FloorOrchestrator {
    index: Arc<DiningIndex>,
    engine: AssignmentEngine,
    enrichers: Enrichers,
    write_gate: Mutex<()>,
    state: Mutex<SessionState>,
}

impl FloorOrchestrator {
    /// Create an orchestrator whose planner and enrichers share `generator`
    ///
    /// # Arguments
    /// * `index` - The loaded dataset
    /// * `generator` - Text generation; [`llm_client::DisabledGenerator`]
    ///   makes every step use its fallback
    /// * `temperature` - Sampling temperature for table planning
    pub fn new(index: DiningIndex, generator: SharedGenerator, temperature: f32) -> Self {
        let engine = AssignmentEngine::new()
            .add_planner(GenerativePlanner::new(generator.clone()).with_temperature(temperature));
        Self::from_parts(index, engine, Enrichers::new(generator))
    }

    pub fn from_parts(index: DiningIndex, engine: AssignmentEngine, enrichers: Enrichers) -> Self {
        Self {
            index: Arc::new(index),
            engine,
            enrichers,
            write_gate: Mutex::new(()),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// The dataset document exactly as loaded
    pub fn dining_data(&self) -> &Value {
        self.index.document()
    }

    /// Replace the roster and build a fresh assignment.
    ///
    /// ## Algorithm
    /// 1. Take the write gate
    /// 2. Extract records on the blocking pool
    /// 3. Run the assignment engine (never fails)
    /// 4. Keep the diners that appear in the new assignment
    /// 5. Under the state lock: install everything and clear all caches
    ///
    /// Returns the new tables per waiter, without summaries.
    #[instrument(skip(self))]
    pub async fn set_attendance(&self, waiter_ids: Vec<WaiterId>) -> ServiceResult<Vec<WaiterAssignment>> {
        let start_time = Instant::now();
        let _gate = self.write_gate.lock().await;

        let extraction = tokio::task::spawn_blocking({
            let index = self.index.clone();
            move || index.extract_reservations()
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("Reservation extraction panicked: {e}")))?;

        let outcome = self.engine.assign(&waiter_ids, &extraction.records).await;
        let assignment = outcome.assignment;

        let diners: DinerLookup = extraction
            .diners
            .into_iter()
            .filter(|(name, _)| assignment.contains_diner(name))
            .collect();
        let roster: Vec<WaiterId> = assignment.waiters().collect();

        let mut state = self.state.lock().await;
        state.replace(roster, assignment, diners, outcome.source);
        let views = assignment_views(&state, |_| None);

        info!(
            "Attendance updated for {} waiters in {:.2?}",
            state.roster.len(),
            start_time.elapsed()
        );
        Ok(views)
    }

    /// Roster plus each waiter's tables and briefing.
    ///
    /// Briefings are generated on first read and cached until the next
    /// attendance update.
    #[instrument(skip(self))]
    pub async fn get_attendance(&self) -> Attendance {
        let mut guard = self.state.lock().await;
        let SessionState {
            roster,
            assignment,
            cache,
            ..
        } = &mut *guard;

        let mut summaries = Vec::with_capacity(roster.len());
        for &waiter in roster.iter() {
            let summary = cache
                .summary_for(waiter, waiter_name(waiter), assignment.tables(waiter), &self.enrichers)
                .await;
            summaries.push(summary);
        }

        let mut summaries = summaries.into_iter();
        let assignments = assignment_views(&guard, |_| summaries.next());
        Attendance {
            present_waiters: guard.roster.clone(),
            assignments,
        }
    }

    /// Totals over the current assignment.
    ///
    /// Special events are counted once per distinct assigned diner; each
    /// detection lands in the special-event cache.
    ///
    /// Cold detections run concurrently but still under the state lock, so
    /// other queries wait for roughly one generation timeout at worst.
    #[instrument(skip(self))]
    pub async fn daily_stats(&self) -> DailyStats {
        let mut guard = self.state.lock().await;
        let SessionState {
            assignment,
            diners,
            cache,
            ..
        } = &mut *guard;

        let total_reservations = assignment.total_tables();
        let total_guests: u64 = assignment.records().map(|r| u64::from(r.number_of_people)).sum();

        let names: BTreeSet<&str> = assignment.records().map(|r| r.diner_name.as_str()).collect();
        let assigned: Vec<&Diner> = names
            .into_iter()
            .filter_map(|name| diners.get(name).map(|diner| diner.as_ref()))
            .collect();
        let special_events = cache
            .special_events_for(&assigned, &self.enrichers)
            .await
            .iter()
            .filter(|event| event.has_event)
            .count();

        debug!(
            "Stats: {} reservations, {} guests, {} special events",
            total_reservations, total_guests, special_events
        );
        DailyStats {
            total_reservations,
            total_guests,
            special_events,
        }
    }

    /// Allergy line and special event for a diner in the current assignment
    #[instrument(skip(self))]
    pub async fn allergies(&self, diner_name: &str) -> ServiceResult<DinerAllergies> {
        let mut state = self.state.lock().await;
        let diner = state
            .diner(diner_name)
            .ok_or_else(|| ServiceError::NotFound(diner_name.to_string()))?;

        let allergies = state.cache.allergies_for(&diner, &self.enrichers).await;
        let event = state.cache.special_event_for(&diner, &self.enrichers).await;

        Ok(DinerAllergies {
            diner_name: diner.name.clone(),
            allergies,
            special_event: if event.has_event { event.event_type } else { None },
        })
    }

    /// Service preferences for a diner in the current assignment
    #[instrument(skip(self))]
    pub async fn preferences(&self, diner_name: &str) -> ServiceResult<DinerPreferences> {
        let mut state = self.state.lock().await;
        let diner = state
            .diner(diner_name)
            .ok_or_else(|| ServiceError::NotFound(diner_name.to_string()))?;

        let preferences = state.cache.preferences_for(&diner, &self.enrichers).await;
        Ok(DinerPreferences {
            diner_name: diner.name.clone(),
            preferences,
        })
    }

    /// How the current assignment was produced
    pub async fn plan_source(&self) -> Option<PlanSource> {
        self.state.lock().await.source.clone()
    }

    pub async fn cache_sizes(&self) -> CacheSizes {
        self.state.lock().await.cache.sizes()
    }
}

/// Format the current assignment; `summary` is called once per waiter in
/// roster order
fn assignment_views(
    state: &SessionState,
    mut summary: impl FnMut(WaiterId) -> Option<String>,
) -> Vec<WaiterAssignment> {
    state
        .roster
        .iter()
        .map(|&waiter| {
            let tables = state
                .assignment
                .tables(waiter)
                .iter()
                .map(|record| {
                    let allergies = state
                        .cache
                        .cached_allergies(&record.diner_name)
                        .map(str::to_string);
                    TableView::from_record(record, allergies)
                })
                .collect();
            WaiterAssignment::new(waiter, tables, summary(waiter))
        })
        .collect()
}
