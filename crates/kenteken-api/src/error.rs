//! Error types for the kenteken service.

use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request-time errors, rendered as plain-text responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error reading request body")]
    RequestBody(#[source] axum::Error),

    #[error("Error Unmarshalling JSON")]
    Decode(#[source] serde_json::Error),

    #[error("Kenteken already in database")]
    DuplicateRecord(String),

    #[error("Error inserting Kenteken into database")]
    StoreUnavailable(String),

    #[error("Invalid request method")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RequestBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DuplicateRecord(_) => StatusCode::CONFLICT,
            ApiError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Only the fixed message reaches the client; causes stay in the log.
        (self.status(), format!("{}\n", self)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateRecord(kenteken) => ApiError::DuplicateRecord(kenteken),
            StoreError::StoreUnavailable(reason) => ApiError::StoreUnavailable(reason),
        }
    }
}

/// Startup failures. The binary exits on any of these.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error("Failed to open log file: {0}")]
    LogFile(#[source] std::io::Error),

    #[error("Failed to install log subscriber: {0}")]
    Logging(String),

    #[error("Failed to connect to database: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Table kenteken has no unique index on Kentekennummer; create it (see schema.sql) or set DUPLICATE_STRATEGY=check_then_insert")]
    MissingUniqueIndex,

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
