//! Ethereum JSON-RPC gateway
//!
//! Entry point for the gateway that lets Ethereum wallets talk to the
//! ledger. Loads configuration from environment/.env file and starts the
//! HTTP listener on the configured address.

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eth_gateway::config::{Config, DEFAULT_LOG_FILTER};
use eth_gateway::server::start_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    info!("=== Ethereum JSON-RPC gateway ===");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return Err(e);
        }
    };

    start_server(config).await?;

    Ok(())
}
