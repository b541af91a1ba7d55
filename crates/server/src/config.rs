//! Server configuration.
//!
//! Every setting is a command-line flag that can also come from the
//! environment (or a `.env` file loaded before parsing).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser};
use llm_client::http::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use llm_client::{DisabledGenerator, HttpTextGenerator, SharedGenerator, TimeoutGenerator};
use tracing::{info, warn};

#[derive(Clone, Parser)]
#[command(name = "laudure-server", about = "French Laudure floor service API")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "FL_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Path to the fine-dining dataset JSON
    #[arg(long, env = "FL_DATASET", default_value = "fine-dining-dataset.json")]
    pub dataset: PathBuf,

    /// Frontend origin allowed by CORS
    #[arg(long, env = "FL_CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    #[command(flatten)]
    pub llm: LlmConfig,
}

/// Settings for the text-generation service
#[derive(Clone, Args)]
pub struct LlmConfig {
    /// Root of an OpenAI-compatible API
    #[arg(long = "llm-base-url", env = "LLM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long = "llm-model", env = "LLM_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Bearer token; without it every caller uses its fallback
    #[arg(long = "llm-api-key", env = "LLM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upper bound on a single generation call
    #[arg(long = "llm-timeout-secs", env = "LLM_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Sampling temperature for table planning
    #[arg(long = "llm-temperature", env = "LLM_TEMPERATURE", default_value_t = 0.2)]
    pub temperature: f32,
}

impl LlmConfig {
    /// Configuration with no API key, so generation is disabled
    pub fn offline() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: 30,
            temperature: 0.2,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the generator every component shares.
    ///
    /// With an API key this is the HTTP client bounded by the timeout;
    /// without one it is [`DisabledGenerator`].
    pub fn build_generator(&self) -> SharedGenerator {
        match self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                info!(
                    "Text generation via {} (model {}, timeout {:?})",
                    self.base_url,
                    self.model,
                    self.timeout()
                );
                let client = HttpTextGenerator::new(&self.base_url, key, &self.model);
                Arc::new(TimeoutGenerator::new(client, self.timeout()))
            }
            None => {
                warn!("LLM_API_KEY not set; using round-robin planning and default enrichments");
                Arc::new(DisabledGenerator)
            }
        }
    }
}
