//! Cleanup configuration resolution
//!
//! Merges the two configuration sources of a [`Cleanable`] entity into one
//! ordered execution plan: the declarative cleanup list first, in its
//! original order, then the annotated method rules, which overwrite
//! declarative rules under the same relation name while keeping the
//! overwritten key's position. `IndexMap::insert` gives exactly these
//! semantics, which is why the resolved plan is an [`IndexMap`].

use crate::config::CleanupConfig;
use crate::core::entity::Cleanable;
use crate::core::rule::{CleanupEntry, CleanupRule, CleanupSpec};
use indexmap::IndexMap;

/// Resolves an entity's cleanup configuration into an ordered rule set
pub struct ConfigResolver;

impl ConfigResolver {
    /// Build the ordered mapping of relation name to cleanup rule
    ///
    /// Raises no errors: entity-level defaults fill unset fields, scalar
    /// settings were already normalized at the entry level, and empty
    /// relation names are skipped with a warning. Handler names are
    /// captured verbatim; resolution happens at execution time.
    pub fn parse(entity: &dyn Cleanable) -> IndexMap<String, CleanupRule> {
        let config = entity.cleanup_config();
        let mut rules = IndexMap::new();

        for entry in &config.cleanups {
            match entry {
                CleanupEntry::Bare(relation) => {
                    Self::insert(&mut rules, relation, CleanupSpec::default(), config);
                }
                CleanupEntry::Settings(map) => {
                    for (relation, settings) in map {
                        Self::insert(&mut rules, relation, settings.to_spec(), config);
                    }
                }
            }
        }

        for (method, spec) in entity.annotated_rules() {
            Self::insert(&mut rules, &method, spec, config);
        }

        rules
    }

    fn insert(
        rules: &mut IndexMap<String, CleanupRule>,
        relation: &str,
        spec: CleanupSpec,
        defaults: &CleanupConfig,
    ) {
        if relation.is_empty() {
            tracing::warn!("skipping cleanup entry with empty relation name");
            return;
        }

        rules.insert(
            relation.to_string(),
            CleanupRule {
                relation: relation.to_string(),
                handler: spec.handler,
                propagate_soft_delete: spec
                    .propagate_soft_delete
                    .unwrap_or(defaults.propagate_soft_delete),
                queue: spec.queue.or_else(|| defaults.queue.clone()),
            },
        );
    }
}
