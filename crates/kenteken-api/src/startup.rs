//! Startup phase: log sink, database connection, listener.

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::StartupError;
use crate::logging::init_logging;
use crate::store::{connect_options, DuplicateStrategy, MySqlStore, RegistrationStore};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// A bound, not yet running HTTP server.
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until the process is killed.
    pub async fn run(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}

/// Run the full startup sequence against MySQL.
///
/// Failures after the log sink is up are also written to the log.
pub async fn bootstrap(config: &Config) -> Result<Server, StartupError> {
    init_logging(config)?;
    info!("Starting kenteken API");

    let result = connect_and_bind(config).await;
    if let Err(e) = &result {
        error!("Startup failed: {}", e);
    }
    result
}

async fn connect_and_bind(config: &Config) -> Result<Server, StartupError> {
    let options = connect_options(config)?;
    info!(
        host = %config.mysql_host,
        port = %config.mysql_port,
        database = %config.mysql_database,
        "Connecting to database"
    );
    let store = MySqlStore::connect(options, config.duplicate_strategy).await?;

    if store.strategy() == DuplicateStrategy::UniqueConstraint {
        store.verify_unique_index().await?;
    }

    bind(Arc::new(store), config).await
}

/// Bind the HTTP listener for an already opened store.
pub async fn bind(
    store: Arc<dyn RegistrationStore>,
    config: &Config,
) -> Result<Server, StartupError> {
    let state = AppState::new(store).with_max_body_bytes(config.max_body_bytes);
    let router = create_router(state);

    let addr = format!("{}:{}", config.listen_addr, config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(%addr, "Listening");

    Ok(Server { listener, router })
}
