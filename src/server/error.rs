use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::{command::CommandError, ledger::LedgerError, money::MoneyError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Anything a request can fail with, before or inside the ledger.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Command(_) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(err) => match err {
                LedgerError::AlreadyExists(_) => StatusCode::CONFLICT,
                LedgerError::ClientNotFound(_) => StatusCode::NOT_FOUND,
                LedgerError::InsufficientFunds { .. } => StatusCode::FORBIDDEN,
                LedgerError::Money(MoneyError::NegativeAmount(_)) => StatusCode::BAD_REQUEST,
                LedgerError::Money(MoneyError::Overflow) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed unexpectedly");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
