//! In-Memory Record Store Adapter
//!
//! Holds decision records in memory and serves them as snapshots.
//! Useful for testing and for embedding the engine in other services.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::record::{Record, RecordSnapshot};
use crate::ports::RecordSource;

/// In-memory record store.
///
/// Records are kept in insertion order; duplicates are only detected when a
/// snapshot is taken, the same way a real store would surface them.
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Vec<Record>>>,
    unavailable: bool,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            unavailable: false,
        }
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            unavailable: false,
        }
    }

    /// Create a store whose every read fails with `SourceUnavailable`
    pub fn unavailable() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            unavailable: true,
        }
    }

    /// Append a record
    pub async fn insert(&self, record: Record) {
        self.records.write().await.push(record);
    }

    /// Remove every record
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordStore {
    async fn load_snapshot(&self) -> Result<RecordSnapshot, DomainError> {
        if self.unavailable {
            return Err(DomainError::new(
                ErrorCode::SourceUnavailable,
                "In-memory record store is marked unavailable",
            ));
        }

        let records = self.records.read().await.clone();
        Ok(RecordSnapshot::from_records(records)?)
    }
}
