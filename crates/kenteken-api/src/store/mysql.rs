//! MySQL-backed registration store.

use super::{DuplicateStrategy, RegistrationStore, StoreError};
use crate::config::Config;
use crate::error::StartupError;
use anyhow::anyhow;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{debug, error, info, instrument, warn};

/// Exact, case-sensitive lookup regardless of the column collation.
const SELECT_KENTEKEN: &str = "SELECT 1 FROM kenteken WHERE BINARY Kentekennummer = ? LIMIT 1";

const INSERT_KENTEKEN: &str = "INSERT INTO kenteken (Kentekennummer) VALUES (?)";

/// A unique index whose only column is `Kentekennummer`.
const SELECT_UNIQUE_INDEX: &str = "SELECT INDEX_NAME FROM information_schema.STATISTICS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = 'kenteken' AND NON_UNIQUE = 0 \
     GROUP BY INDEX_NAME \
     HAVING COUNT(*) = 1 AND MAX(COLUMN_NAME) = 'Kentekennummer' \
     LIMIT 1";

/// Build MySQL connection options from the service configuration.
pub fn connect_options(config: &Config) -> Result<MySqlConnectOptions, StartupError> {
    let port: u16 = config.mysql_port.trim().parse().map_err(|_| {
        StartupError::Config(anyhow!("MYSQL_PORT is not a valid port: {:?}", config.mysql_port))
    })?;

    Ok(MySqlConnectOptions::new()
        .host(&config.mysql_host)
        .port(port)
        .username(&config.mysql_user)
        .password(config.mysql_password.expose_secret())
        .database(&config.mysql_database))
}

/// Registration store on a MySQL `kenteken` table.
pub struct MySqlStore {
    pool: MySqlPool,
    strategy: DuplicateStrategy,
}

impl MySqlStore {
    /// Wrap an existing pool.
    pub fn new(pool: MySqlPool, strategy: DuplicateStrategy) -> Self {
        Self { pool, strategy }
    }

    /// Open a pool and verify the server is reachable.
    pub async fn connect(
        options: MySqlConnectOptions,
        strategy: DuplicateStrategy,
    ) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new().connect_with(options).await?;
        info!(?strategy, "Connected to MySQL");
        Ok(Self::new(pool, strategy))
    }

    /// Configured duplicate detection strategy.
    pub fn strategy(&self) -> DuplicateStrategy {
        self.strategy
    }

    /// Check that the table carries the unique index `UniqueConstraint` relies on.
    pub async fn verify_unique_index(&self) -> Result<(), StartupError> {
        let row = sqlx::query(SELECT_UNIQUE_INDEX)
            .fetch_optional(&self.pool)
            .await?;

        require_unique_index(row.is_some())
    }

    /// Whether a row with exactly this kenteken exists.
    async fn exists(&self, kenteken: &str) -> Result<bool, StoreError> {
        let row = sqlx::query(SELECT_KENTEKEN)
            .bind(kenteken)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(kenteken = %kenteken, error = %e, "Error checking duplicate kenteken");
                StoreError::from(e)
            })?;

        Ok(row.is_some())
    }

    async fn insert_row(&self, kenteken: &str) -> Result<(), StoreError> {
        sqlx::query(INSERT_KENTEKEN)
            .bind(kenteken)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(kenteken, e))?;

        Ok(())
    }
}

/// Unique-key violations become `DuplicateRecord`; anything else means the
/// store could not run the statement.
fn map_insert_error(kenteken: &str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            warn!(kenteken = %kenteken, "Kenteken already in database");
            return StoreError::DuplicateRecord(kenteken.to_string());
        }
    }

    error!(kenteken = %kenteken, error = %e, "Error inserting Kenteken into database");
    StoreError::from(e)
}

fn require_unique_index(found: bool) -> Result<(), StartupError> {
    if found {
        info!("Unique index on kenteken.Kentekennummer present");
        Ok(())
    } else {
        error!("No unique index on kenteken.Kentekennummer");
        Err(StartupError::MissingUniqueIndex)
    }
}

#[async_trait]
impl RegistrationStore for MySqlStore {
    #[instrument(skip(self), fields(strategy = ?self.strategy))]
    async fn insert(&self, kenteken: &str) -> Result<(), StoreError> {
        if self.strategy == DuplicateStrategy::CheckThenInsert && self.exists(kenteken).await? {
            warn!(kenteken = %kenteken, "Kenteken already in database");
            return Err(StoreError::DuplicateRecord(kenteken.to_string()));
        }

        self.insert_row(kenteken).await?;
        debug!(kenteken = %kenteken, "Kenteken stored");
        Ok(())
    }
}
