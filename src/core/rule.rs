//! Cleanup rule data model
//!
//! A [`CleanupRule`] is one relation's resolved cleanup policy. Rules are
//! built fresh on every delete event from two sources: the entity's
//! declarative [`CleanupEntry`] list and the per-method rules exposed by
//! [`Cleanable::annotated_rules`](crate::core::entity::Cleanable::annotated_rules).
//! They never outlive one dispatch pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One relation's resolved cleanup policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupRule {
    /// Name of the relation on the owning entity
    pub relation: String,

    /// Registered name of the handler applied to the related set before
    /// deletion, if any. Resolution happens at execution time, never during
    /// configuration parsing.
    pub handler: Option<String>,

    /// When the owning delete was a soft delete, cascade it as a soft
    /// delete instead of a hard delete
    pub propagate_soft_delete: bool,

    /// Queue name for deferred execution; `None` means the cleanup runs
    /// synchronously inside the delete operation
    pub queue: Option<String>,
}

/// Raw per-relation settings before entity-level defaults are applied
///
/// `None` fields fall back to the owning entity's configured defaults when
/// the rule set is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagate_soft_delete: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

impl CleanupSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(mut self, name: impl Into<String>) -> Self {
        self.handler = Some(name.into());
        self
    }

    pub fn propagate_soft_delete(mut self, propagate: bool) -> Self {
        self.propagate_soft_delete = Some(propagate);
        self
    }

    pub fn queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }
}

/// Settings attached to one declarative entry
///
/// A scalar string is normalized as the handler name (positional shorthand);
/// a map carries the full settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanupSettings {
    /// Shorthand: `relation: handler_name`
    Handler(String),
    /// Full form: `relation: { handler: ..., queue: ..., ... }`
    Spec(CleanupSpec),
}

impl CleanupSettings {
    /// Normalize into a [`CleanupSpec`]
    pub fn to_spec(&self) -> CleanupSpec {
        match self {
            CleanupSettings::Handler(name) => CleanupSpec::new().handler(name.clone()),
            CleanupSettings::Spec(spec) => spec.clone(),
        }
    }
}

/// One entry of the entity's declarative cleanup list
///
/// Either a bare relation name (default settings) or a relation-to-settings
/// mapping. Matches the config shapes:
///
/// ```yaml
/// cleanups:
///   - comments
///   - attachments: scrub_private
///   - revisions:
///       propagate_soft_delete: true
///       queue: cleanup
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanupEntry {
    /// Relation name with default settings
    Bare(String),
    /// Relation name(s) mapped to settings
    Settings(IndexMap<String, CleanupSettings>),
}

impl CleanupEntry {
    /// Build a configured entry for a single relation
    pub fn with_settings(relation: impl Into<String>, spec: CleanupSpec) -> Self {
        let mut map = IndexMap::new();
        map.insert(relation.into(), CleanupSettings::Spec(spec));
        CleanupEntry::Settings(map)
    }
}

impl From<&str> for CleanupEntry {
    fn from(relation: &str) -> Self {
        CleanupEntry::Bare(relation.to_string())
    }
}

impl From<String> for CleanupEntry {
    fn from(relation: String) -> Self {
        CleanupEntry::Bare(relation)
    }
}

/// Detached reference to the owning entity
///
/// This is what rides the queue instead of the live entity: identity only,
/// no loaded relation data is ever serialized into a job payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub id: Uuid,
    pub entity_type: String,
}

impl OwnerRef {
    pub fn new(id: Uuid, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
        }
    }
}

/// A related record as it crosses the persistence seam
///
/// Records are carried as JSON so the engine stays agnostic to concrete
/// entity types, the same way dynamic entity fetching works elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedRecord {
    pub id: Uuid,
    pub record_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RelatedRecord {
    pub fn new(record_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            record_type: record_type.into(),
            data,
        }
    }
}
