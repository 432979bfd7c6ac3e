use std::sync::Arc;

use anyhow::{Context, Result};
use mem_ledger::{config::ServerConfig, ledger::in_memory::InMemoryLedger, server, telemetry};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    telemetry::init(config.log_json);

    let addr = config.bind_address()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind `{addr}`"))?;

    info!(policy = ?config.funds_policy, "starting with an empty ledger");
    let ledger = Arc::new(InMemoryLedger::with_policy(config.funds_policy));

    server::serve(listener, ledger, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "cannot listen for ctrl-c, shutting down");
    }
    info!("shutdown requested");
}
