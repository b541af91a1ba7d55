//! Text-generation client for the assignment and enrichment steps.
//!
//! This crate provides a Rust client for an external chat-completions
//! service. It handles:
//! - The [`TextGenerator`] seam every caller depends on
//! - An OpenAI-compatible HTTP implementation
//! - Bounding each call with a timeout
//! - Pulling JSON out of free-form model output
//!
//! Nothing returned by a generator is trusted. Callers validate the text
//! and fall back to their own defaults on any [`LlmClientError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub mod http;
pub mod json;

pub use http::HttpTextGenerator;
pub use json::parse_json;

/// Errors that can occur when interacting with the generation service
#[derive(Error, Debug)]
pub enum LlmClientError {
    #[error("Generation service is not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to reach generation service: {0}")]
    Transport(String),

    #[error("Generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from generation service: {0}")]
    InvalidResponse(String),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, LlmClientError>;

/// One prompt sent to the generation service
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Create a request with default sampling (temperature 0.3, 1000 tokens)
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Anything that turns a prompt into free text.
///
/// ## Design Note
/// - `Send + Sync` so one generator can be shared across request handlers
/// - Implementations may fail in any way; callers treat every error as
///   recoverable
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Name used in log lines
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Shared handle to a generator
pub type SharedGenerator = Arc<dyn TextGenerator>;

/// Generator used when no service is configured.
///
/// Every call fails immediately, which sends every caller down its
/// deterministic fallback path.
#[derive(Debug, Clone, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(LlmClientError::NotConfigured(
            "no API key provided".to_string(),
        ))
    }
}

/// Wraps another generator and bounds every call.
pub struct TimeoutGenerator<G> {
    inner: G,
    timeout: Duration,
}

impl<G: TextGenerator> TimeoutGenerator<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for TimeoutGenerator<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.inner.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Generation via {} exceeded {:?}, abandoning call",
                    self.inner.name(),
                    self.timeout
                );
                Err(LlmClientError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            Ok(request.prompt.clone())
        }
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("system", "prompt")
            .with_temperature(0.7)
            .with_max_tokens(150);

        assert_eq!(request.system, "system");
        assert_eq!(request.prompt, "prompt");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 150);
    }

    #[tokio::test]
    async fn test_disabled_generator_always_fails() {
        let request = GenerationRequest::new("s", "p");
        let err = DisabledGenerator.generate(&request).await.unwrap_err();
        assert!(matches!(err, LlmClientError::NotConfigured(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_generator_abandons_slow_call() {
        let generator = TimeoutGenerator::new(SlowGenerator, Duration::from_millis(100));
        let err = generator
            .generate(&GenerationRequest::new("s", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmClientError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_timeout_generator_passes_fast_call_through() {
        let generator = TimeoutGenerator::new(EchoGenerator, Duration::from_secs(1));
        let text = generator
            .generate(&GenerationRequest::new("s", "hello"))
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(generator.name(), "echo");
    }
}
