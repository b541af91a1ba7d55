//! Preference extraction
//!
//! Pulls a handful of service preferences (seating, pacing, favourite
//! dishes, wine) out of a diner's history.
//!
//! ## Default
//! Any failure yields an empty list.

use data_loader::Diner;
use llm_client::{GenerationRequest, SharedGenerator, parse_json};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::context::{diner_context, reservation_lines};
use crate::error::{EnrichError, Result};

const SYSTEM_PROMPT: &str = "You brief fine-dining waiters on their guests. \
You extract concise service preferences. Respond with valid JSON only.";

/// Upper bound on how many preferences are kept
const MAX_PREFERENCES: usize = 5;

pub struct PreferenceExtractor {
    generator: SharedGenerator,
}

impl PreferenceExtractor {
    pub fn new(generator: SharedGenerator) -> Self {
        Self { generator }
    }

    /// Preferences for a diner, or an empty list when extraction fails
    #[instrument(skip(self, diner), fields(diner = %diner.name))]
    pub async fn extract(&self, diner: &Diner) -> Vec<String> {
        match self.try_extract(diner).await {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!("Preference extraction failed, using empty list: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_extract(&self, diner: &Diner) -> Result<Vec<String>> {
        let prompt = format!(
            "{}\n\n{}\n\nList up to {MAX_PREFERENCES} short preferences a waiter should know \
             about this guest (seating, pacing, favourite dishes, drinks, service style). \
             Reply with a JSON array of strings. Reply [] if nothing stands out.",
            diner_context(diner),
            reservation_lines(diner)
        );
        let request = GenerationRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(0.3)
            .with_max_tokens(200);

        let text = self.generator.generate(&request).await?;
        let raw: Vec<Value> = parse_json(&text)?;
        validate(raw)
    }
}

/// Every element must be a string; blanks are dropped, the list is capped
fn validate(raw: Vec<Value>) -> Result<Vec<String>> {
    let mut preferences = Vec::with_capacity(raw.len());
    for value in raw {
        match value {
            Value::String(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    preferences.push(text.to_string());
                }
            }
            other => {
                return Err(EnrichError::InvalidOutput(format!(
                    "expected a string preference, got {other}"
                )));
            }
        }
    }
    preferences.truncate(MAX_PREFERENCES);
    Ok(preferences)
}
