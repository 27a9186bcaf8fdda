//! Cleanup handlers: user-supplied transforms applied before deletion

use crate::core::error::ConfigError;
use crate::core::rule::RelatedRecord;
use std::collections::HashMap;

/// Filter or transform the related-record set before cascading deletion
///
/// A handler scopes which related records qualify for cleanup, e.g. keeping
/// published revisions while drafts are removed. Returning the input
/// unchanged is valid; returning an empty set skips deletion entirely.
pub trait CleanupHandler: Send + Sync {
    fn apply(&self, records: Vec<RelatedRecord>) -> Vec<RelatedRecord>;
}

impl std::fmt::Debug for dyn CleanupHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn CleanupHandler")
    }
}

type HandlerFactory = Box<dyn Fn() -> Box<dyn CleanupHandler> + Send + Sync>;

/// Registry resolving handler names to fresh handler instances
///
/// Rules reference handlers by name only; a new instance is built for every
/// execution. Registration happens once at startup; the dispatcher validates
/// names before dispatch and the executor instantiates them when a job runs,
/// never during configuration parsing.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler factory under a name
    pub fn register<F, H>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> H + Send + Sync + 'static,
        H: CleanupHandler + 'static,
    {
        self.factories
            .insert(name.into(), Box::new(move || Box::new(factory())));
    }

    /// Instantiate the handler registered under `name`
    pub fn resolve(&self, name: &str) -> Result<Box<dyn CleanupHandler>, ConfigError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownHandler {
                name: name.to_string(),
            })
    }

    /// Check whether a handler name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
