//! Lifecycle hook wiring delete events to the cleanup dispatcher
//!
//! Thin glue with two entry points: `on_deleted` dispatches with
//! `is_force = false`, `on_force_deleted` with `is_force = true`. The force
//! path is effective only for entity types with soft-delete capability; for
//! anything else the regular delete already cascaded, so it is a no-op.
//!
//! The hook can be called directly from a delete path, or attached to an
//! [`EventBus`] to consume published delete events on its own task.

use crate::core::cleaner::Cleaner;
use crate::core::entity::Cleanable;
use crate::core::error::CleanError;
use crate::core::events::{DeleteKind, EventBus};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Entity delete lifecycle adapter
pub struct LifecycleHook {
    cleaner: Arc<Cleaner>,
}

impl LifecycleHook {
    pub fn new(cleaner: Arc<Cleaner>) -> Self {
        Self { cleaner }
    }

    /// Entity was deleted (soft delete for soft-capable types)
    pub async fn on_deleted(&self, entity: &dyn Cleanable) -> Result<(), CleanError> {
        self.cleaner.handle(entity, false).await
    }

    /// Entity was force-deleted
    ///
    /// Only meaningful for soft-delete-capable types; otherwise the regular
    /// deleted event already covered the cascade and this is a no-op.
    pub async fn on_force_deleted(&self, entity: &dyn Cleanable) -> Result<(), CleanError> {
        if !self.cleaner.supports_soft_delete(entity.entity_type()) {
            tracing::debug!(
                entity_type = %entity.entity_type(),
                "skipping force-delete hook for type without soft-delete support"
            );
            return Ok(());
        }
        self.cleaner.handle(entity, true).await
    }

    /// Attach the hook to an event bus
    ///
    /// Spawns a task consuming delete events until the bus closes. Returns
    /// the task handle so callers can abort it during shutdown. Failures of
    /// individual cascades are logged and do not stop the loop.
    pub fn attach(self, bus: &EventBus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();

        tokio::spawn(async move {
            tracing::debug!("cleanup lifecycle hook attached");

            loop {
                match rx.recv().await {
                    Ok(envelope) => {
                        let entity = envelope.event.entity.as_ref();
                        let result = match envelope.event.kind {
                            DeleteKind::Deleted => self.on_deleted(entity).await,
                            DeleteKind::ForceDeleted => self.on_force_deleted(entity).await,
                        };

                        if let Err(err) = result {
                            tracing::error!(
                                entity_type = %entity.entity_type(),
                                entity_id = %entity.id(),
                                error = %err,
                                "cascading cleanup failed"
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "delete event subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("event bus closed, stopping cleanup lifecycle hook");
                        break;
                    }
                }
            }
        })
    }
}
