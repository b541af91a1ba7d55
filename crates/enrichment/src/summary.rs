//! Per-waiter briefing
//!
//! Writes a short paragraph a waiter can read before service: how many
//! tables, when the rush is, and anything special to watch for.
//!
//! ## Default
//! Any failure yields [`fallback_summary`], built from raw counts only.

use data_loader::ReservationRecord;
use llm_client::{GenerationRequest, SharedGenerator};
use tracing::{instrument, warn};

use crate::context::table_lines;
use crate::error::{EnrichError, Result};

const SYSTEM_PROMPT: &str = "You are the maître d' of a fine-dining restaurant. \
You brief each waiter on their section before service in a warm, concise tone.";

const MAX_CHARS: usize = 1200;

pub struct SummaryWriter {
    generator: SharedGenerator,
}

impl SummaryWriter {
    pub fn new(generator: SharedGenerator) -> Self {
        Self { generator }
    }

    /// Briefing for one waiter's tables, or the templated fallback
    #[instrument(skip(self, tables), fields(waiter = %waiter_name, tables = tables.len()))]
    pub async fn write(&self, waiter_name: &str, tables: &[ReservationRecord]) -> String {
        if tables.is_empty() {
            return fallback_summary(waiter_name, tables);
        }
        match self.try_write(waiter_name, tables).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Summary generation failed, using template: {}", e);
                fallback_summary(waiter_name, tables)
            }
        }
    }

    async fn try_write(&self, waiter_name: &str, tables: &[ReservationRecord]) -> Result<String> {
        let prompt = format!(
            "Waiter: {waiter_name}\nTables tonight, in seating order:\n{}\n\n\
             Write a briefing of at most four sentences covering the busiest \
             period, the largest parties and any dietary needs visible in the orders.",
            table_lines(tables)
        );
        let request = GenerationRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(0.5)
            .with_max_tokens(300);

        let text = self.generator.generate(&request).await?;
        let text = text.trim();
        if text.is_empty() || text.chars().count() > MAX_CHARS {
            return Err(EnrichError::InvalidOutput(format!(
                "summary of {} characters",
                text.chars().count()
            )));
        }
        Ok(text.to_string())
    }
}

/// Summary built from counts when generation is unavailable.
///
/// `tables` is expected in seating order; first and last entries give the
/// time span.
pub fn fallback_summary(waiter_name: &str, tables: &[ReservationRecord]) -> String {
    match (tables.first(), tables.last()) {
        (Some(first), Some(last)) => {
            let guests: u64 = tables.iter().map(|t| u64::from(t.number_of_people)).sum();
            let noun = if tables.len() == 1 { "table" } else { "tables" };
            format!(
                "{waiter_name} has {} {noun} tonight serving {guests} guests, from {} to {}.",
                tables.len(),
                first.start_time,
                last.start_time
            )
        }
        _ => format!("{waiter_name} has no tables assigned tonight."),
    }
}
