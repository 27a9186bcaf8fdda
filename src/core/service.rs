//! Service traits for the persistence and queue seams
//!
//! The engine is agnostic to the underlying storage and queue transport.
//! These traits are its only view of both: relation loading and delete
//! execution belong to the persistence layer, deferred execution belongs to
//! the queue system.

use crate::core::error::CleanError;
use crate::core::job::CleanupJob;
use crate::core::rule::{OwnerRef, RelatedRecord};
use async_trait::async_trait;

/// Service trait for the external persistence layer
///
/// Implementations resolve relations by name and execute bulk deletes. The
/// engine performs no storage I/O itself; it is a policy decision plus a
/// call-out through this trait.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// Resolve a named relation on the owning entity
    ///
    /// Returns the set of related records currently eligible for cleanup.
    /// An unknown relation surfaces as
    /// [`RelationError::UnknownRelation`](crate::core::error::RelationError::UnknownRelation).
    async fn load_relation(
        &self,
        owner: &OwnerRef,
        relation: &str,
    ) -> Result<Vec<RelatedRecord>, CleanError>;

    /// Hard-delete a set of records
    async fn delete_records(&self, records: &[RelatedRecord]) -> Result<(), CleanError>;

    /// Soft-delete a set of records (mark deleted, keep queryable as trashed)
    async fn soft_delete_records(&self, records: &[RelatedRecord]) -> Result<(), CleanError>;

    /// Capability query: does this record type support soft deletion
    fn supports_soft_delete(&self, record_type: &str) -> bool;
}

/// Service trait for the external queue transport
///
/// Submission is fire-and-forget: the engine never blocks waiting for a
/// queued job to complete, and retry/backoff belongs to the queue system.
#[async_trait]
pub trait CleanupQueue: Send + Sync {
    /// Enqueue a cleanup job on the named queue
    async fn submit(&self, job: CleanupJob, queue_name: &str) -> Result<(), CleanError>;
}
