//! Special-event detection
//!
//! Decides whether a diner's visit marks an occasion (birthday,
//! anniversary, proposal, business dinner...) so the floor can prepare.
//!
//! ## Default
//! Any failure yields [`SpecialEvent::none`].

use data_loader::Diner;
use llm_client::{GenerationRequest, SharedGenerator, parse_json};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::context::{diner_context, reservation_lines};
use crate::error::{EnrichError, Result};

const SYSTEM_PROMPT: &str = "You help a fine-dining restaurant prepare for guests. \
You detect special occasions from guest correspondence. Respond with valid JSON only.";

/// Used when the model says there is an event but does not name it
const UNNAMED_EVENT: &str = "Special occasion";

/// Whether a diner is celebrating something, and what
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub has_event: bool,
    pub event_type: Option<String>,
}

impl SpecialEvent {
    pub fn none() -> Self {
        Self {
            has_event: false,
            event_type: None,
        }
    }

    pub fn named(event_type: impl Into<String>) -> Self {
        Self {
            has_event: true,
            event_type: Some(event_type.into()),
        }
    }
}

/// Shape requested from the model
#[derive(Debug, Deserialize)]
struct DetectionOutput {
    has_special_event: bool,
    #[serde(default)]
    event_type: Option<String>,
}

pub struct EventDetector {
    generator: SharedGenerator,
}

impl EventDetector {
    pub fn new(generator: SharedGenerator) -> Self {
        Self { generator }
    }

    /// Special event for a diner, or none when detection fails
    #[instrument(skip(self, diner), fields(diner = %diner.name))]
    pub async fn detect(&self, diner: &Diner) -> SpecialEvent {
        match self.try_detect(diner).await {
            Ok(event) => event,
            Err(e) => {
                warn!("Special-event detection failed, assuming none: {}", e);
                SpecialEvent::none()
            }
        }
    }

    async fn try_detect(&self, diner: &Diner) -> Result<SpecialEvent> {
        let prompt = format!(
            "{}\n\n{}\n\nIs this guest celebrating a special occasion on their visit \
             (birthday, anniversary, engagement, promotion, business celebration, ...)? \
             Reply with a JSON object: {{\"has_special_event\": true|false, \
             \"event_type\": \"short name of the occasion\" or null}}.",
            diner_context(diner),
            reservation_lines(diner)
        );
        let request = GenerationRequest::new(SYSTEM_PROMPT, prompt)
            .with_temperature(0.0)
            .with_max_tokens(100);

        let text = self.generator.generate(&request).await?;
        let output: DetectionOutput = parse_json(&text)?;
        interpret(output)
    }
}

fn interpret(output: DetectionOutput) -> Result<SpecialEvent> {
    if !output.has_special_event {
        return Ok(SpecialEvent::none());
    }
    let name = output
        .event_type
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    match name {
        Some(name) if name.chars().count() > 80 => Err(EnrichError::InvalidOutput(
            "event name is implausibly long".to_string(),
        )),
        Some(name) => Ok(SpecialEvent::named(name)),
        None => Ok(SpecialEvent::named(UNNAMED_EVENT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGenerator, sample_diner};

    #[tokio::test]
    async fn test_detects_named_event() {
        let detector = EventDetector::new(ScriptedGenerator::replying(
            r#"{"has_special_event": true, "event_type": "Anniversary"}"#,
        ));
        assert_eq!(
            detector.detect(&sample_diner("Ana")).await,
            SpecialEvent::named("Anniversary")
        );
    }

    #[tokio::test]
    async fn test_no_event() {
        let detector = EventDetector::new(ScriptedGenerator::replying(
            "```json\n{\"has_special_event\": false, \"event_type\": null}\n```",
        ));
        assert_eq!(detector.detect(&sample_diner("Ana")).await, SpecialEvent::none());
    }

    #[tokio::test]
    async fn test_unnamed_event() {
        let detector = EventDetector::new(ScriptedGenerator::replying(r#"{"has_special_event": true}"#));
        let event = detector.detect(&sample_diner("Ana")).await;
        assert!(event.has_event);
        assert_eq!(event.event_type.as_deref(), Some(UNNAMED_EVENT));
    }

    #[tokio::test]
    async fn test_wrong_shape_uses_default() {
        let detector = EventDetector::new(ScriptedGenerator::replying(r#"{"event": "birthday"}"#));
        assert_eq!(detector.detect(&sample_diner("Ana")).await, SpecialEvent::none());
    }

    #[tokio::test]
    async fn test_failure_uses_default() {
        let detector = EventDetector::new(ScriptedGenerator::failing());
        assert_eq!(detector.detect(&sample_diner("Ana")).await, SpecialEvent::none());
    }
}
