//! Core module containing the cleanup engine's traits and types

pub mod cleaner;
pub mod entity;
pub mod error;
pub mod events;
pub mod handler;
pub mod job;
pub mod lifecycle;
pub mod resolver;
pub mod rule;
pub mod service;

pub use cleaner::Cleaner;
pub use entity::{Cleanable, Entity};
pub use error::{CleanError, ConfigError, DeletionError, RelationError};
pub use events::{DeleteEvent, DeleteKind, EventBus, EventEnvelope};
pub use handler::{CleanupHandler, HandlerRegistry};
pub use job::{CleanupJob, JobExecutor};
pub use lifecycle::LifecycleHook;
pub use resolver::ConfigResolver;
pub use rule::{CleanupEntry, CleanupRule, CleanupSettings, CleanupSpec, OwnerRef, RelatedRecord};
pub use service::{CleanupQueue, PersistenceService};
