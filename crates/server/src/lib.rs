//! Server crate for the French Laudure floor service.
//!
//! This crate owns the session state and exposes it over HTTP:
//! - [`FloorOrchestrator`] coordinates extraction, assignment and the
//!   derived-data cache
//! - [`routes`] maps the orchestrator onto axum handlers
//! - [`ServerConfig`] gathers flags and environment variables

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod routes;
pub mod state;
pub mod views;
pub mod waiters;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::DiningIndex;

pub use config::{LlmConfig, ServerConfig};
pub use error::ServiceError;
pub use orchestrator::FloorOrchestrator;
pub use views::{Attendance, DailyStats, DinerAllergies, DinerPreferences, TableView, WaiterAssignment};

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load the dataset, build the orchestrator and serve until shutdown
pub async fn run(config: ServerConfig) -> Result<()> {
    info!("Loading dataset from {}", config.dataset.display());
    let index = DiningIndex::load_or_empty(&config.dataset);
    info!("Dataset ready: {:?}", index.counts());

    let generator = config.llm.build_generator();
    let orchestrator = Arc::new(FloorOrchestrator::new(index, generator, config.llm.temperature));
    let app = routes::build_app(orchestrator, &config.cors_origin)?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Listening on http://{}", config.bind);

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
