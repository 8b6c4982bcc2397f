//! Registration store: persisted kenteken records with duplicate detection.

mod memory;
mod mysql;

pub use memory::MemoryStore;
pub use mysql::{connect_options, MySqlStore};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Registration store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Kenteken already in database: {0}")]
    DuplicateRecord(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::StoreUnavailable(e.to_string())
    }
}

/// How a store detects an already-present kenteken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStrategy {
    /// Single insert; a unique-key violation signals the duplicate.
    #[default]
    UniqueConstraint,
    /// Lookup query followed by a separate insert. Not atomic.
    CheckThenInsert,
}

/// A store of registration numbers.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert a kenteken, failing with `DuplicateRecord` if it is already stored.
    ///
    /// Matching is exact and case-sensitive. No format validation is applied.
    async fn insert(&self, kenteken: &str) -> Result<(), StoreError>;
}
