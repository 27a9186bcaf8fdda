//! # Cleans-RS
//!
//! Cascading cleanup of related records when an owning entity is deleted.
//!
//! When a parent entity is removed, its configured dependent relations are
//! removed too, synchronously or via a deferred work queue, with optional
//! propagation of soft-delete semantics.
//!
//! ## Features
//!
//! - **Two configuration sources**: a declarative per-relation cleanup list
//!   and per-method annotated rules, merged into one ordered execution plan
//!   (annotated rules win, positions are preserved)
//! - **Sync or queued execution**: a rule's queue name alone decides whether
//!   its cleanup runs inline or is submitted fire-and-forget
//! - **Soft-delete propagation**: a soft-deleted owner can cascade as soft
//!   deletes to capable related types, with hard-delete fallback
//! - **Independent failure domains**: one relation's failure never blocks
//!   dispatch of the next
//! - **Storage-agnostic**: the persistence layer and queue transport are
//!   trait seams; in-memory reference implementations ship for development
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cleans::prelude::*;
//!
//! impl_cleanable!(Post, "post", { title: String });
//!
//! let persistence = Arc::new(InMemoryPersistence::new());
//! let handlers = Arc::new(HandlerRegistry::new());
//! let executor = Arc::new(JobExecutor::new(persistence.clone(), handlers));
//! let queue = Arc::new(TokioQueue::new(executor.clone()));
//! let cleaner = Arc::new(Cleaner::new(executor, queue));
//!
//! let mut post = Post::new("hello".to_string());
//! post.set_cleanups(vec![
//!     "comments".into(),
//!     CleanupEntry::with_settings("revisions", CleanupSpec::new().queue("cleanup")),
//! ]);
//!
//! // Entry points on delete:
//! let hook = LifecycleHook::new(cleaner);
//! hook.on_deleted(&post).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod queue;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        cleaner::Cleaner,
        entity::{Cleanable, Entity},
        error::{CleanError, ConfigError, DeletionError, RelationError},
        events::{DeleteEvent, DeleteKind, EventBus, EventEnvelope},
        handler::{CleanupHandler, HandlerRegistry},
        job::{CleanupJob, JobExecutor},
        lifecycle::LifecycleHook,
        resolver::ConfigResolver,
        rule::{CleanupEntry, CleanupRule, CleanupSettings, CleanupSpec, OwnerRef, RelatedRecord},
        service::{CleanupQueue, PersistenceService},
    };

    // === Macros ===
    pub use crate::impl_cleanable;

    // === Config ===
    pub use crate::config::CleanupConfig;

    // === Queue ===
    pub use crate::queue::TokioQueue;

    // === Storage ===
    pub use crate::storage::InMemoryPersistence;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
