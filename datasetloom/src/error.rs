use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::v1::response::ApiResponse;

#[derive(Error, Debug)]
pub enum LoomError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Stale preview cache: {0}")]
    StaleCache(String),

    #[error("Transaction failed during {operation}: {source}")]
    Transaction {
        operation: &'static str,
        #[source]
        source: Box<LoomError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl LoomError {
    /// Wrap a failure raised inside an atomic block. Caller-facing
    /// precondition failures pass through unchanged.
    pub fn in_transaction(operation: &'static str, err: LoomError) -> Self {
        match err {
            LoomError::NotFound(_)
            | LoomError::InvalidOperation(_)
            | LoomError::Validation(_)
            | LoomError::Transaction { .. } => err,
            other => LoomError::Transaction {
                operation,
                source: Box::new(other),
            },
        }
    }
}

impl From<validator::ValidationErrors> for LoomError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LoomError::Validation(errors.to_string())
    }
}

impl IntoResponse for LoomError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, LoomError>;
