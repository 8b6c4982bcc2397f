//! In-memory registration store.

use super::{RegistrationStore, StoreError};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// In-memory kenteken store.
///
/// Lookup and insert happen under one write lock, so concurrent inserts of
/// the same kenteken never both succeed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashSet<String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashSet::new()),
        }
    }

    /// Number of stored rows matching the kenteken exactly.
    pub async fn count(&self, kenteken: &str) -> usize {
        usize::from(self.records.read().await.contains(kenteken))
    }

    /// Total number of stored rows.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn insert(&self, kenteken: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        if !records.insert(kenteken.to_string()) {
            warn!(kenteken = %kenteken, "Kenteken already in database");
            return Err(StoreError::DuplicateRecord(kenteken.to_string()));
        }

        debug!(kenteken = %kenteken, total = records.len(), "Kenteken stored in memory");
        Ok(())
    }
}
