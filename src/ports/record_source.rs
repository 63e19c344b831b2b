//! RecordSource port - supplies decision records to the engine.
//!
//! The engine never performs I/O itself: callers resolve the snapshot through
//! this port first and hand the immutable result to the domain services.

use async_trait::async_trait;

use crate::domain::foundation::{ContextId, DomainError};
use crate::domain::record::RecordSnapshot;

/// Read-only access to a store of Cause, Action and Outcome records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Loads every record as one immutable snapshot.
    ///
    /// # Errors
    /// - `SourceUnavailable` when the store cannot be read
    /// - `DuplicateRecord` when the store holds one identifier twice
    async fn load_snapshot(&self) -> Result<RecordSnapshot, DomainError>;

    /// Lists the contexts present in the store, ascending.
    async fn list_contexts(&self) -> Result<Vec<ContextId>, DomainError> {
        Ok(self.load_snapshot().await?.contexts())
    }
}
