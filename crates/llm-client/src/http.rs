//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::{GenerationRequest, LlmClientError, Result, TextGenerator};

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API root; anything speaking the same protocol works
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for a chat-completions endpoint.
///
/// Sends the system instruction and prompt as two messages and returns the
/// first choice's content verbatim.
#[derive(Clone)]
pub struct HttpTextGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpTextGenerator {
    /// Create a client.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://api.openai.com/v1"
    /// * `api_key` - Bearer token
    /// * `model` - Model name passed through in every request
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        debug!(
            "Requesting completion from {} ({} prompt chars)",
            self.model,
            request.prompt.len()
        );

        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": &request.system},
                {"role": "user", "content": &request.prompt}
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Generation request failed: {}", e);
                LlmClientError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Generation service returned {}: {}", status, body);
            return Err(LlmClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("no choices returned".to_string()))
    }
}
