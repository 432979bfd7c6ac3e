use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::{
    account::ClientId,
    command::{LedgerCommand, Outcome},
};

use super::{AppState, error::ApiError};

/// Identity payload, `{"email": "..."}`.
#[derive(Debug, Serialize)]
pub struct Identity {
    pub email: ClientId,
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Created(email) => {
                let body = Json(Identity { email });
                (StatusCode::CREATED, body).into_response()
            }
            Outcome::Balance(money) => (StatusCode::OK, Json(money)).into_response(),
            Outcome::Done => StatusCode::OK.into_response(),
        }
    }
}

fn run(state: &AppState, cmd: LedgerCommand) -> Result<Outcome, ApiError> {
    debug!(kind = ?cmd.kind(), "executing ledger command");
    Ok(cmd.execute(state.ledger.as_ref())?)
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn create_client(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Outcome, ApiError> {
    run(&state, LedgerCommand::create(&email))
}

pub async fn balance(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Outcome, ApiError> {
    run(&state, LedgerCommand::balance(&email))
}

pub async fn deposit(
    State(state): State<AppState>,
    Path((email, amount)): Path<(String, String)>,
) -> Result<Outcome, ApiError> {
    run(&state, LedgerCommand::deposit(&email, &amount)?)
}

pub async fn withdraw(
    State(state): State<AppState>,
    Path((email, amount)): Path<(String, String)>,
) -> Result<Outcome, ApiError> {
    run(&state, LedgerCommand::withdraw(&email, &amount)?)
}

pub async fn transfer(
    State(state): State<AppState>,
    Path((sender, receiver, amount)): Path<(String, String, String)>,
) -> Result<Outcome, ApiError> {
    let cmd = LedgerCommand::transfer(&sender, &receiver, &amount)?;
    run(&state, cmd)
}
