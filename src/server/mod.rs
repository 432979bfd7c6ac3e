//! HTTP surface of the ledger.
//!
//! Handlers only translate: path parameters go through [`LedgerCommand`]
//! parsing, the command runs synchronously against the shared ledger, and
//! the outcome or error becomes a status code plus JSON body.
//!
//! [`LedgerCommand`]: crate::command::LedgerCommand

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ledger::Ledger;

pub mod error;
pub mod handlers;

const TRANSFER: &str = "/transfer/:sender/:receiver/:amount";

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
}

pub fn router(ledger: Arc<dyn Ledger>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/create/:email", put(handlers::create_client))
        .route("/balance/:email", get(handlers::balance))
        .route("/deposit/:email/:amount", post(handlers::deposit))
        .route("/withdraw/:email/:amount", post(handlers::withdraw))
        .route(TRANSFER, post(handlers::transfer))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { ledger })
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn serve(
    listener: TcpListener,
    ledger: Arc<dyn Ledger>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "ledger server listening");
    axum::serve(listener, router(ledger))
        .with_graceful_shutdown(shutdown)
        .await
        .context("ledger server failed")
}
