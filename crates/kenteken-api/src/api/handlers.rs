//! HTTP request handlers.

use super::types::KentekenRequest;
use super::AppState;
use crate::error::ApiError;
use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
};
use tracing::{error, info, warn};

/// Store a kenteken.
///
/// The body is read and decoded by hand so that unreadable and malformed
/// bodies map to the service's own error responses.
pub async fn store_kenteken(
    State(state): State<AppState>,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let bytes = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| {
            error!(error = %e, "Error reading request body");
            ApiError::RequestBody(e)
        })?;

    let request: KentekenRequest = serde_json::from_slice(&bytes).map_err(|e| {
        error!(error = %e, "Error Unmarshalling JSON");
        ApiError::Decode(e)
    })?;

    match state.store.insert(&request.kenteken).await {
        Ok(()) => {
            info!(kenteken = %request.kenteken, "Kenteken stored");
            Ok(StatusCode::CREATED)
        }
        Err(e) => {
            warn!(kenteken = %request.kenteken, error = %e, "Kenteken not stored");
            Err(e.into())
        }
    }
}

/// Any method other than POST on the kenteken route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
