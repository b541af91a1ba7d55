//! Planner that asks the generation service for an assignment.
//!
//! The service gets the roster and every reservation, plus the fairness
//! hints (balanced counts, no overlapping seatings for one waiter, party
//! size as load). Its answer is untrusted: it must parse as a JSON object
//! keyed by waiter id, and every reservation in it must match exactly one
//! extracted record. Anything else is rejected as a whole.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use data_loader::{ClockTime, ReservationRecord, WaiterId, parse_clock_time};
use llm_client::{GenerationRequest, SharedGenerator, parse_json};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PlanError, Result};
use crate::plan::Assignment;
use crate::traits::Planner;

const SYSTEM_PROMPT: &str = "You are the floor manager of a fine-dining restaurant. \
You assign reservations to the waiters on duty. Respond with valid JSON only.";

/// Asks a [`TextGenerator`](llm_client::TextGenerator) to plan the floor.
pub struct GenerativePlanner {
    generator: SharedGenerator,
    temperature: f32,
    max_tokens: u32,
}

impl GenerativePlanner {
    pub fn new(generator: SharedGenerator) -> Self {
        Self {
            generator,
            temperature: 0.2,
            max_tokens: 4000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_request(&self, waiters: &[WaiterId], records: &[ReservationRecord]) -> Result<GenerationRequest> {
        let reservations = serde_json::to_string_pretty(records)
            .map_err(|e| PlanError::InvalidPlan(format!("could not encode reservations: {e}")))?;
        let roster = waiters
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = format!(
            "Waiters on duty (ids): [{roster}]\n\n\
             Reservations for tonight:\n{reservations}\n\n\
             Assign every reservation to exactly one waiter.\n\
             - Keep the number of tables per waiter as equal as possible.\n\
             - Avoid giving one waiter several tables that start at the same time or within 90 minutes of each other.\n\
             - Treat larger parties as more work when balancing.\n\n\
             Return a JSON object whose keys are the waiter ids as strings and whose values are \
             arrays of the reservation objects copied unchanged (diner_name, start_time, \
             number_of_people, orders)."
        );

        Ok(GenerationRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens))
    }
}

#[async_trait]
impl Planner for GenerativePlanner {
    fn name(&self) -> &str {
        "GenerativePlanner"
    }

    async fn plan(
        &self,
        waiters: &[WaiterId],
        records: &[ReservationRecord],
    ) -> Result<Assignment> {
        let request = self.build_request(waiters, records)?;
        let text = self.generator.generate(&request).await?;
        debug!("Planner output from {}: {} chars", self.generator.name(), text.len());

        let raw: Map<String, Value> = parse_json(&text)?;
        validate_plan(raw, waiters, records)
    }
}

/// Shape we expect for each reservation in the model's answer
#[derive(Debug, Deserialize)]
struct PlannedTable {
    diner_name: String,
    start_time: String,
    number_of_people: u32,
}

/// Identity used to match planned tables back to extracted records
type RecordKey = (String, ClockTime, u32);

/// Turn the model's object into a trusted [`Assignment`].
///
/// ## Checks
/// 1. Every key is a waiter id from the roster
/// 2. Every value is an array of reservation objects
/// 3. Every reservation matches an extracted record not already used
/// 4. No extracted record is left over
///
/// The returned assignment is built from the extracted records, never from
/// the model's copies of them.
pub fn validate_plan(
    raw: Map<String, Value>,
    waiters: &[WaiterId],
    records: &[ReservationRecord],
) -> Result<Assignment> {
    let roster: BTreeSet<WaiterId> = waiters.iter().copied().collect();

    // Unclaimed record positions per identity; duplicates in the dataset
    // are legitimate, so each key may own several positions.
    let mut pool: HashMap<RecordKey, Vec<usize>> = HashMap::new();
    for (position, record) in records.iter().enumerate().rev() {
        pool.entry(record_key(record)).or_default().push(position);
    }

    let mut assignment = Assignment::for_waiters(waiters);
    let mut claimed = 0usize;

    for (key, value) in raw {
        let waiter: WaiterId = key
            .trim()
            .parse()
            .map_err(|_| PlanError::InvalidPlan(format!("key '{key}' is not a waiter id")))?;
        if !roster.contains(&waiter) {
            return Err(PlanError::InvalidPlan(format!("waiter {waiter} is not on the roster")));
        }

        let tables: Vec<PlannedTable> = serde_json::from_value(value).map_err(|e| {
            PlanError::InvalidPlan(format!("tables for waiter {waiter} are malformed: {e}"))
        })?;

        for table in tables {
            let start_time = parse_clock_time(&table.start_time).map_err(|e| {
                PlanError::InvalidPlan(format!("table for {}: {e}", table.diner_name))
            })?;
            let lookup = (table.diner_name, start_time, table.number_of_people);
            let position = pool
                .get_mut(&lookup)
                .and_then(Vec::pop)
                .ok_or_else(|| {
                    PlanError::InvalidPlan(format!(
                        "reservation for {} at {} is unknown or assigned twice",
                        lookup.0, lookup.1
                    ))
                })?;
            assignment.push(waiter, records[position].clone());
            claimed += 1;
        }
    }

    if claimed != records.len() {
        return Err(PlanError::InvalidPlan(format!(
            "{} of {} reservations were not assigned",
            records.len() - claimed,
            records.len()
        )));
    }

    Ok(assignment)
}

fn record_key(record: &ReservationRecord) -> RecordKey {
    (
        record.diner_name.clone(),
        record.start_time,
        record.number_of_people,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str, time: &str, people: u32) -> ReservationRecord {
        ReservationRecord {
            diner_name: name.to_string(),
            start_time: parse_clock_time(time).unwrap(),
            number_of_people: people,
            orders: vec![],
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> Vec<ReservationRecord> {
        vec![
            record("Amelie", "18:00", 2),
            record("Bastien", "19:30", 4),
            record("Amelie", "21:00", 2),
        ]
    }

    #[test]
    fn test_valid_plan_uses_extracted_records() {
        let records = sample();
        let raw = object(json!({
            "1": [{"diner_name": "Amelie", "start_time": "6:00 PM", "number_of_people": 2, "orders": [{"item": "made up"}]}],
            "2": [
                {"diner_name": "Bastien", "start_time": "19:30", "number_of_people": 4},
                {"diner_name": "Amelie", "start_time": "21:00", "number_of_people": 2}
            ]
        }));

        let assignment = validate_plan(raw, &[1, 2], &records).unwrap();
        assert_eq!(assignment.tables(1), &[records[0].clone()]);
        assert_eq!(assignment.tables(2).len(), 2);
        // orders come from the dataset, not the model
        assert!(assignment.tables(1)[0].orders.is_empty());
    }

    #[test]
    fn test_missing_waiter_key_gets_empty_list() {
        let records = sample();
        let raw = object(json!({
            "1": [
                {"diner_name": "Amelie", "start_time": "18:00", "number_of_people": 2},
                {"diner_name": "Bastien", "start_time": "19:30", "number_of_people": 4},
                {"diner_name": "Amelie", "start_time": "21:00", "number_of_people": 2}
            ]
        }));

        let assignment = validate_plan(raw, &[1, 2], &records).unwrap();
        assert_eq!(assignment.tables(1).len(), 3);
        assert!(assignment.tables(2).is_empty());
    }

    #[test]
    fn test_unknown_waiter_is_rejected() {
        let raw = object(json!({"7": []}));
        let err = validate_plan(raw, &[1, 2], &[]).unwrap_err();
        assert!(matches!(err, PlanError::InvalidPlan(_)));
    }

    #[test]
    fn test_non_numeric_key_is_rejected() {
        let raw = object(json!({"waiter_one": []}));
        assert!(validate_plan(raw, &[1], &[]).is_err());
    }

    #[test]
    fn test_hallucinated_reservation_is_rejected() {
        let records = sample();
        let raw = object(json!({
            "1": [{"diner_name": "Ghost", "start_time": "18:00", "number_of_people": 2}]
        }));
        assert!(validate_plan(raw, &[1], &records).is_err());
    }

    #[test]
    fn test_duplicate_reservation_is_rejected() {
        let records = vec![record("Amelie", "18:00", 2)];
        let raw = object(json!({
            "1": [{"diner_name": "Amelie", "start_time": "18:00", "number_of_people": 2}],
            "2": [{"diner_name": "Amelie", "start_time": "18:00", "number_of_people": 2}]
        }));
        assert!(validate_plan(raw, &[1, 2], &records).is_err());
    }

    #[test]
    fn test_dropped_reservation_is_rejected() {
        let records = sample();
        let raw = object(json!({
            "1": [{"diner_name": "Amelie", "start_time": "18:00", "number_of_people": 2}]
        }));
        let err = validate_plan(raw, &[1], &records).unwrap_err();
        assert!(err.to_string().contains("2 of 3"));
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let raw = object(json!({"1": "all of them"}));
        assert!(validate_plan(raw, &[1], &sample()).is_err());
    }

    #[test]
    fn test_identical_records_can_each_be_claimed_once() {
        let records = vec![record("Twin", "19:00", 2), record("Twin", "19:00", 2)];
        let raw = object(json!({
            "1": [{"diner_name": "Twin", "start_time": "19:00", "number_of_people": 2}],
            "2": [{"diner_name": "Twin", "start_time": "19:00", "number_of_people": 2}]
        }));
        let assignment = validate_plan(raw, &[1, 2], &records).unwrap();
        assert_eq!(assignment.total_tables(), 2);
    }
}
