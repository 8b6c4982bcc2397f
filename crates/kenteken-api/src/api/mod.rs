//! HTTP API for the kenteken service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{outcome_middleware, Outcome};
pub use types::*;

use crate::store::RegistrationStore;
use axum::{middleware as axum_middleware, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Route accepting new registration numbers.
pub const STORE_KENTEKEN_PATH: &str = "/storeKenteken";

/// Default upper bound on request body size.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration store
    pub store: Arc<dyn RegistrationStore>,
    /// Upper bound on request body size
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Arc<dyn RegistrationStore>) -> Self {
        Self {
            store,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Override the request body size limit.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            STORE_KENTEKEN_PATH,
            post(handlers::store_kenteken).fallback(handlers::method_not_allowed),
        )
        .layer(axum_middleware::from_fn(outcome_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
