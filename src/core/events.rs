//! Delete event bus
//!
//! The EventBus decouples entity deletion from cascade dispatch. It uses
//! `tokio::sync::broadcast`, so publishing is non-blocking fire-and-forget
//! and multiple hooks can subscribe independently.
//!
//! ```text
//! delete path ──▶ EventBus::publish_deleted() ──▶ broadcast ──▶ LifecycleHook
//! ```

use crate::core::entity::Cleanable;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// How the owning entity was deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteKind {
    /// Regular delete (soft delete for soft-capable types)
    Deleted,
    /// Forced delete bypassing soft-delete marking
    ForceDeleted,
}

/// A delete notification carrying the affected entity
#[derive(Clone)]
pub struct DeleteEvent {
    pub entity: Arc<dyn Cleanable>,
    pub kind: DeleteKind,
}

impl fmt::Debug for DeleteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleteEvent")
            .field("entity_type", &self.entity.entity_type())
            .field("entity_id", &self.entity.id())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Envelope wrapping a delete event with metadata
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event was published
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: DeleteEvent,
}

impl EventEnvelope {
    pub fn new(event: DeleteEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based bus for delete events
///
/// Cheap to clone and shareable across tasks. Publishing never fails: with
/// no subscribers the event is dropped, and lagging subscribers observe a
/// `Lagged` error on their next recv.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a "deleted" event for an entity
    ///
    /// Returns the number of subscribers that will receive it.
    pub fn publish_deleted(&self, entity: Arc<dyn Cleanable>) -> usize {
        self.publish(DeleteEvent {
            entity,
            kind: DeleteKind::Deleted,
        })
    }

    /// Publish a "force-deleted" event for an entity
    pub fn publish_force_deleted(&self, entity: Arc<dyn Cleanable>) -> usize {
        self.publish(DeleteEvent {
            entity,
            kind: DeleteKind::ForceDeleted,
        })
    }

    /// Publish a delete event to all subscribers
    pub fn publish(&self, event: DeleteEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() errs only when there are no receivers, which is fine
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to future delete events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
