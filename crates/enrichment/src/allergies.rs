//! Allergy extraction
//!
//! Reads a diner's emails, reviews and order tags and produces one short
//! line of allergies and dietary restrictions for the floor staff.
//!
//! ## Default
//! Any failure yields [`NO_ALLERGIES`].

use data_loader::Diner;
use llm_client::{GenerationRequest, SharedGenerator};
use tracing::{instrument, warn};

use crate::context::diner_context;
use crate::error::{EnrichError, Result};

/// Text used when nothing is known or extraction failed
pub const NO_ALLERGIES: &str = "No Allergies";

const SYSTEM_PROMPT: &str = "You help restaurant staff keep guests safe. \
You extract food allergies and dietary restrictions from guest correspondence.";

/// Longest answer accepted before we assume the model rambled
const MAX_CHARS: usize = 300;

pub struct AllergyExtractor {
    generator: SharedGenerator,
}

impl AllergyExtractor {
    pub fn new(generator: SharedGenerator) -> Self {
        Self { generator }
    }

    /// Allergies for a diner, or [`NO_ALLERGIES`] when extraction fails
    #[instrument(skip(self, diner), fields(diner = %diner.name))]
    pub async fn extract(&self, diner: &Diner) -> String {
        match self.try_extract(diner).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Allergy extraction failed, using default: {}", e);
                NO_ALLERGIES.to_string()
            }
        }
    }

    async fn try_extract(&self, diner: &Diner) -> Result<String> {
        let prompt = format!(
            "{}\n\nList every food allergy or dietary restriction this guest has, \
             as a single short comma-separated line. \
             If there are none, reply exactly \"{NO_ALLERGIES}\".",
            diner_context(diner)
        );
        let request = GenerationRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(0.0)
            .with_max_tokens(100);

        let text = self.generator.generate(&request).await?;
        clean_answer(&text)
    }
}

/// Trim quotes and whitespace; reject empty or runaway answers
fn clean_answer(text: &str) -> Result<String> {
    let cleaned = text.trim().trim_matches('"').trim();
    if cleaned.is_empty() {
        return Err(EnrichError::InvalidOutput("empty answer".to_string()));
    }
    if cleaned.chars().count() > MAX_CHARS {
        return Err(EnrichError::InvalidOutput(format!(
            "answer longer than {MAX_CHARS} characters"
        )));
    }
    Ok(cleaned.to_string())
}
