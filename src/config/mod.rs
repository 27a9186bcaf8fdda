//! Cleanup configuration loading and management

use crate::core::rule::CleanupEntry;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Cleanup configuration carried by an entity
///
/// Holds the declarative cleanup list plus the entity-level defaults that
/// apply to any rule not setting the field itself. This struct backs the
/// accessor surface of [`Cleanable`](crate::core::entity::Cleanable).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Relations cleaned when the owning entity is deleted
    #[serde(default)]
    pub cleanups: Vec<CleanupEntry>,

    /// Default soft-delete propagation for rules that do not set it
    #[serde(default)]
    pub propagate_soft_delete: bool,

    /// Default queue for rules that do not set one; `None` keeps cleanup
    /// synchronous unless a rule opts into a queue itself
    #[serde(default)]
    pub queue: Option<String>,
}

impl CleanupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
