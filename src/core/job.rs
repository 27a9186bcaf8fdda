//! Cleanup work items and their executor
//!
//! A [`CleanupJob`] is the unit dispatched per relation: it is serializable
//! so it can ride an external queue, and it carries a detached
//! [`OwnerRef`](crate::core::rule::OwnerRef) instead of the live entity so
//! no loaded relation data ends up in a queue payload.
//!
//! [`JobExecutor`] runs a job against the persistence layer: load the
//! relation, apply the handler, decide hard-vs-soft per record type, and
//! delegate the delete calls. It never catches, swallows, or retries
//! persistence errors.

use crate::core::error::CleanError;
use crate::core::handler::HandlerRegistry;
use crate::core::rule::{CleanupRule, OwnerRef, RelatedRecord};
use crate::core::service::PersistenceService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One relation's cleanup work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupJob {
    /// Detached reference to the owning entity (relations unloaded)
    pub owner: OwnerRef,

    /// Relation to clean on the owner
    pub relation: String,

    /// Registered handler name, resolved when the job executes
    pub handler: Option<String>,

    /// Cascade a soft owning delete as a soft delete
    pub propagate_soft_delete: bool,

    /// Whether the triggering delete was a forced/hard delete
    pub is_force: bool,
}

impl CleanupJob {
    /// Build the work item for one resolved rule
    pub fn new(owner: OwnerRef, rule: &CleanupRule, is_force: bool) -> Self {
        Self {
            owner,
            relation: rule.relation.clone(),
            handler: rule.handler.clone(),
            propagate_soft_delete: rule.propagate_soft_delete,
            is_force,
        }
    }
}

/// Executes cleanup jobs against the persistence layer
///
/// Shared by the synchronous dispatch path and the queue workers: both end
/// up in [`JobExecutor::execute`].
pub struct JobExecutor {
    persistence: Arc<dyn PersistenceService>,
    handlers: Arc<HandlerRegistry>,
}

impl JobExecutor {
    pub fn new(persistence: Arc<dyn PersistenceService>, handlers: Arc<HandlerRegistry>) -> Self {
        Self {
            persistence,
            handlers,
        }
    }

    /// Capability passthrough used by the dispatcher and lifecycle hook
    pub fn supports_soft_delete(&self, entity_type: &str) -> bool {
        self.persistence.supports_soft_delete(entity_type)
    }

    /// Whether a handler name is registered, checked by the dispatcher
    /// before a job is executed or submitted
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains(name)
    }

    /// Run one cleanup job to completion
    ///
    /// Deletion mode for the related records:
    /// - owning delete was not soft (`is_force`, or the owner type has no
    ///   soft-delete capability): hard-delete everything;
    /// - owning delete was soft and `propagate_soft_delete` is false:
    ///   hard-delete everything;
    /// - owning delete was soft and `propagate_soft_delete` is true:
    ///   soft-delete records whose type supports it, hard-delete the rest.
    pub async fn execute(&self, job: &CleanupJob) -> Result<(), CleanError> {
        let records = self
            .persistence
            .load_relation(&job.owner, &job.relation)
            .await?;

        let records = match &job.handler {
            Some(name) => self.handlers.resolve(name)?.apply(records),
            None => records,
        };

        if records.is_empty() {
            tracing::debug!(
                relation = %job.relation,
                owner = %job.owner.id,
                "no related records to clean"
            );
            return Ok(());
        }

        let owner_was_soft_deleted =
            !job.is_force && self.persistence.supports_soft_delete(&job.owner.entity_type);

        if !owner_was_soft_deleted || !job.propagate_soft_delete {
            return self.persistence.delete_records(&records).await;
        }

        let (soft, hard): (Vec<RelatedRecord>, Vec<RelatedRecord>) = records
            .into_iter()
            .partition(|record| self.persistence.supports_soft_delete(&record.record_type));

        if !hard.is_empty() {
            // Types without soft-delete support fall back to a hard delete.
            tracing::debug!(
                relation = %job.relation,
                count = hard.len(),
                "hard-deleting records without soft-delete support"
            );
            self.persistence.delete_records(&hard).await?;
        }

        if !soft.is_empty() {
            self.persistence.soft_delete_records(&soft).await?;
        }

        Ok(())
    }
}
