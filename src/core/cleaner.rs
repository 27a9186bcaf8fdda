//! The cleanup dispatcher
//!
//! [`Cleaner::handle`] is the engine's entry point for one delete event: it
//! resolves the entity's rules and fans out one work item per relation,
//! inline or onto the configured queue. Each relation is an independent
//! failure domain; a failing relation never prevents dispatch of the next
//! one, but the failure is not suppressed either: it is logged and the
//! first one is returned to the caller once the fan-out completes.

use crate::core::entity::Cleanable;
use crate::core::error::{CleanError, ConfigError};
use crate::core::job::{CleanupJob, JobExecutor};
use crate::core::resolver::ConfigResolver;
use crate::core::rule::OwnerRef;
use crate::core::service::CleanupQueue;
use std::sync::Arc;

/// Resolves cleanup rules for a deleted entity and dispatches them
pub struct Cleaner {
    executor: Arc<JobExecutor>,
    queue: Arc<dyn CleanupQueue>,
}

impl Cleaner {
    pub fn new(executor: Arc<JobExecutor>, queue: Arc<dyn CleanupQueue>) -> Self {
        Self { executor, queue }
    }

    /// Capability query for the owning entity type, used by the lifecycle
    /// hook to gate the force-delete entry point
    pub fn supports_soft_delete(&self, entity_type: &str) -> bool {
        self.executor.supports_soft_delete(entity_type)
    }

    /// Handle one delete event
    ///
    /// `is_force` marks a forced/hard delete of the owner. Rules with a
    /// queue name are submitted fire-and-forget, carrying only a detached
    /// owner reference; the rest execute synchronously on the calling task,
    /// in resolution order. A rule naming an unregistered handler fails
    /// here, before execution or submission, so queued misconfiguration
    /// surfaces at dispatch rather than in a worker's log.
    pub async fn handle(&self, entity: &dyn Cleanable, is_force: bool) -> Result<(), CleanError> {
        let rules = ConfigResolver::parse(entity);
        let owner = OwnerRef::new(entity.id(), entity.entity_type());

        let mut first_err: Option<CleanError> = None;

        for (relation, rule) in rules {
            if let Some(name) = rule.handler.as_deref() {
                if !self.executor.has_handler(name) {
                    tracing::error!(
                        relation = %relation,
                        handler = %name,
                        owner = %owner.id,
                        "cleanup rule names an unregistered handler"
                    );
                    if first_err.is_none() {
                        first_err = Some(CleanError::Config(ConfigError::UnknownHandler {
                            name: name.to_string(),
                        }));
                    }
                    continue;
                }
            }

            let job = CleanupJob::new(owner.clone(), &rule, is_force);

            let outcome = match rule.queue.as_deref() {
                Some(queue) => {
                    tracing::debug!(
                        relation = %relation,
                        queue = %queue,
                        owner = %owner.id,
                        "queueing cleanup"
                    );
                    self.queue.submit(job, queue).await
                }
                None => {
                    tracing::debug!(
                        relation = %relation,
                        owner = %owner.id,
                        "running cleanup inline"
                    );
                    self.executor.execute(&job).await
                }
            };

            if let Err(err) = outcome {
                tracing::error!(
                    relation = %relation,
                    owner = %owner.id,
                    error = %err,
                    "cleanup dispatch failed"
                );
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
