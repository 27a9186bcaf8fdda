//! Persistence implementations
//!
//! The engine only talks to storage through
//! [`PersistenceService`](crate::core::service::PersistenceService); this
//! module provides the in-memory reference implementation used for tests
//! and development.

pub mod in_memory;

pub use in_memory::InMemoryPersistence;
