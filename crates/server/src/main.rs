//! French Laudure API server.

use anyhow::Result;
use clap::Parser;

use server::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    server::init_tracing();

    let config = ServerConfig::parse();
    server::run(config).await
}
