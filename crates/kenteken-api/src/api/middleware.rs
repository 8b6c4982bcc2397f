//! Outcome logging for kenteken requests.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::{debug, error, info, warn};

/// What happened to a request, as seen from its response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stored,
    Duplicate,
    Rejected,
    Failed,
}

impl Outcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::CREATED => Outcome::Stored,
            StatusCode::CONFLICT => Outcome::Duplicate,
            s if s.is_server_error() => Outcome::Failed,
            _ => Outcome::Rejected,
        }
    }
}

/// Log one line per request with its outcome and duration.
///
/// Request/response details are left to `TraceLayer`.
pub async fn outcome_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    match Outcome::from_status(status) {
        Outcome::Stored => info!(%method, elapsed_ms, "Kenteken request stored"),
        Outcome::Duplicate => warn!(%method, elapsed_ms, "Kenteken request was a duplicate"),
        Outcome::Failed => error!(%method, %status, elapsed_ms, "Kenteken request failed"),
        Outcome::Rejected => debug!(%method, %status, elapsed_ms, "Kenteken request rejected"),
    }

    response
}
