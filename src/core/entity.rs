//! Entity traits defining the cleanup surface of owning records
//!
//! [`Entity`] carries the metadata the engine needs from any owning record:
//! identity, type name, and soft-delete state. [`Cleanable`] adds the
//! cleanup configuration surface: declarative entries, entity-level
//! defaults, and the per-method annotated rule registry.
//!
//! The engine only ever reads from these traits. Triggering a cascade never
//! mutates the owning entity's own stored state.

use crate::config::CleanupConfig;
use crate::core::rule::{CleanupEntry, CleanupSpec};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for entities whose deletion can cascade
pub trait Entity: Send + Sync {
    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the entity type name (e.g., "post", "user")
    fn entity_type(&self) -> &str;

    /// Get the deletion timestamp (soft delete)
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Check if the entity has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Trait for entities that declare cascading cleanup
///
/// Implementors store a [`CleanupConfig`] field and expose it through the
/// two accessor methods; every other method has a default implementation on
/// top of them. The [`impl_cleanable!`](crate::impl_cleanable) macro
/// generates the whole implementation for structs with standard fields.
pub trait Cleanable: Entity {
    /// Access the cleanup configuration backing this entity
    fn cleanup_config(&self) -> &CleanupConfig;

    /// Mutable access to the cleanup configuration
    fn cleanup_config_mut(&mut self) -> &mut CleanupConfig;

    /// Per-method annotated cleanup rules, keyed by method name
    ///
    /// The type-level counterpart of the declarative list: each entry is
    /// one (method name, settings) pair registered at definition time.
    /// Annotated rules overwrite declarative rules under the same key.
    fn annotated_rules(&self) -> Vec<(String, CleanupSpec)> {
        Vec::new()
    }

    // === Declarative cleanup list ===

    /// Get the declarative cleanup entries
    fn cleanups(&self) -> &[CleanupEntry] {
        &self.cleanup_config().cleanups
    }

    /// Replace the declarative cleanup entries
    fn set_cleanups(&mut self, entries: Vec<CleanupEntry>) {
        self.cleanup_config_mut().cleanups = entries;
    }

    /// Append entries to the declarative cleanup list
    fn add_cleanups<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = CleanupEntry>,
        Self: Sized,
    {
        self.cleanup_config_mut().cleanups.extend(entries);
    }

    // === Entity-level defaults ===

    /// Default soft-delete propagation for rules that do not set it
    fn propagate_soft_delete(&self) -> bool {
        self.cleanup_config().propagate_soft_delete
    }

    fn set_propagate_soft_delete(&mut self, propagate: bool) {
        self.cleanup_config_mut().propagate_soft_delete = propagate;
    }

    /// Default queue name for rules that do not set one
    fn cleanup_queue(&self) -> Option<&str> {
        self.cleanup_config().queue.as_deref()
    }

    fn set_cleanup_queue(&mut self, queue: Option<String>) {
        self.cleanup_config_mut().queue = queue;
    }
}
