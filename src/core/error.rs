//! Typed error handling for the cleanup engine
//!
//! Errors follow the taxonomy of the dispatch pipeline:
//!
//! - [`ConfigError`]: problems with the resolved cleanup configuration
//! - [`RelationError`]: a named relation cannot be resolved or loaded
//! - [`DeletionError`]: the persistence layer rejected a delete call
//!
//! The engine performs no local recovery: every error is surfaced to the
//! caller on the synchronous path, or to the queue worker's failure
//! reporting on the asynchronous path.

use thiserror::Error;

/// The main error type for the cleanup engine
///
/// Each variant wraps a more specific error type for that category, so
/// callers can match on the failure class without string inspection.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Cleanup configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Relation resolution errors
    #[error(transparent)]
    Relation(#[from] RelationError),

    /// Persistence-layer deletion errors
    #[error(transparent)]
    Deletion(#[from] DeletionError),

    /// The queue transport rejected a job submission
    #[error("queue '{queue}' rejected cleanup job for relation '{relation}': {message}")]
    Queue {
        queue: String,
        relation: String,
        message: String,
    },
}

/// Errors related to cleanup configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A rule names a handler that was never registered
    #[error("unknown cleanup handler '{name}'")]
    UnknownHandler { name: String },
}

/// Errors related to relation resolution
#[derive(Debug, Error)]
pub enum RelationError {
    /// The named relation does not exist on the owning entity type
    #[error("relation '{relation}' does not exist on entity type '{entity_type}'")]
    UnknownRelation {
        entity_type: String,
        relation: String,
    },

    /// The relation exists but its records could not be loaded
    #[error("failed to load relation '{relation}': {message}")]
    LoadFailed { relation: String, message: String },
}

/// Errors related to delete execution
#[derive(Debug, Error)]
pub enum DeletionError {
    /// A hard delete was rejected by the persistence layer
    #[error("delete rejected for {count} record(s): {message}")]
    DeleteRejected { count: usize, message: String },

    /// A soft delete was rejected by the persistence layer
    #[error("soft delete rejected for {count} record(s): {message}")]
    SoftDeleteRejected { count: usize, message: String },
}
