//! In-memory implementation of PersistenceService for testing and development

use crate::core::error::{CleanError, DeletionError, RelationError};
use crate::core::rule::{OwnerRef, RelatedRecord};
use crate::core::service::PersistenceService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use uuid::Uuid;

struct StoredRecord {
    record: RelatedRecord,
    deleted_at: Option<DateTime<Utc>>,
}

/// In-memory persistence layer
///
/// Relations must be declared per owning entity type before they can be
/// loaded, so an undeclared relation surfaces as
/// [`RelationError::UnknownRelation`] the way a missing relation would on a
/// real schema. Soft-delete capability is tracked per record type.
pub struct InMemoryPersistence {
    records: RwLock<HashMap<Uuid, StoredRecord>>,
    relations: RwLock<HashMap<(Uuid, String), Vec<Uuid>>>,
    declared: RwLock<HashSet<(String, String)>>,
    soft_capable: RwLock<HashSet<String>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            relations: RwLock::new(HashMap::new()),
            declared: RwLock::new(HashSet::new()),
            soft_capable: RwLock::new(HashSet::new()),
        }
    }

    /// Declare a relation on an owning entity type
    pub fn declare_relation(&self, owner_type: &str, relation: &str) {
        if let Ok(mut declared) = self.declared.write() {
            declared.insert((owner_type.to_string(), relation.to_string()));
        }
    }

    /// Mark a record type as supporting soft deletion
    pub fn mark_soft_capable(&self, record_type: &str) {
        if let Ok(mut types) = self.soft_capable.write() {
            types.insert(record_type.to_string());
        }
    }

    /// Store a record
    pub fn insert_record(&self, record: RelatedRecord) {
        if let Ok(mut records) = self.records.write() {
            records.insert(
                record.id,
                StoredRecord {
                    record,
                    deleted_at: None,
                },
            );
        }
    }

    /// Attach a stored record to an owner's relation
    ///
    /// Also declares the relation for the owner's entity type.
    pub fn link(&self, owner: &OwnerRef, relation: &str, record_id: Uuid) {
        self.declare_relation(&owner.entity_type, relation);
        if let Ok(mut relations) = self.relations.write() {
            relations
                .entry((owner.id, relation.to_string()))
                .or_default()
                .push(record_id);
        }
    }

    /// Check whether a record is still stored (soft-deleted or live)
    pub fn contains(&self, id: &Uuid) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(id))
            .unwrap_or(false)
    }

    /// Check whether a record is stored and marked soft-deleted
    pub fn is_soft_deleted(&self, id: &Uuid) -> bool {
        self.records
            .read()
            .map(|records| {
                records
                    .get(id)
                    .is_some_and(|stored| stored.deleted_at.is_some())
            })
            .unwrap_or(false)
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceService for InMemoryPersistence {
    async fn load_relation(
        &self,
        owner: &OwnerRef,
        relation: &str,
    ) -> Result<Vec<RelatedRecord>, CleanError> {
        let declared = self.declared.read().map_err(|e| {
            CleanError::from(RelationError::LoadFailed {
                relation: relation.to_string(),
                message: format!("failed to acquire read lock: {e}"),
            })
        })?;

        if !declared.contains(&(owner.entity_type.clone(), relation.to_string())) {
            return Err(RelationError::UnknownRelation {
                entity_type: owner.entity_type.clone(),
                relation: relation.to_string(),
            }
            .into());
        }
        drop(declared);

        let relations = self.relations.read().map_err(|e| {
            CleanError::from(RelationError::LoadFailed {
                relation: relation.to_string(),
                message: format!("failed to acquire read lock: {e}"),
            })
        })?;
        let records = self.records.read().map_err(|e| {
            CleanError::from(RelationError::LoadFailed {
                relation: relation.to_string(),
                message: format!("failed to acquire read lock: {e}"),
            })
        })?;

        let ids = relations
            .get(&(owner.id, relation.to_string()))
            .cloned()
            .unwrap_or_default();

        Ok(ids
            .iter()
            .filter_map(|id| records.get(id))
            .filter(|stored| stored.deleted_at.is_none())
            .map(|stored| stored.record.clone())
            .collect())
    }

    async fn delete_records(&self, to_delete: &[RelatedRecord]) -> Result<(), CleanError> {
        let mut records = self.records.write().map_err(|e| {
            CleanError::from(DeletionError::DeleteRejected {
                count: to_delete.len(),
                message: format!("failed to acquire write lock: {e}"),
            })
        })?;

        for record in to_delete {
            records.remove(&record.id);
        }

        Ok(())
    }

    async fn soft_delete_records(&self, to_delete: &[RelatedRecord]) -> Result<(), CleanError> {
        let mut records = self.records.write().map_err(|e| {
            CleanError::from(DeletionError::SoftDeleteRejected {
                count: to_delete.len(),
                message: format!("failed to acquire write lock: {e}"),
            })
        })?;

        let now = Utc::now();
        for record in to_delete {
            if let Some(stored) = records.get_mut(&record.id) {
                stored.deleted_at = Some(now);
            }
        }

        Ok(())
    }

    fn supports_soft_delete(&self, record_type: &str) -> bool {
        self.soft_capable
            .read()
            .map(|types| types.contains(record_type))
            .unwrap_or(false)
    }
}
