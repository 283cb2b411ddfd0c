//! Record store plus the facet indexes kept in step with it.

use crate::linear::search_greedy;
use crate::{FacetSearch, Predicate};
use sporedis_model::Record;
use sporedis_store::{RecordStore, StoreError, StoreResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Writes records and maintains every attached facet index.
///
/// The record is written before its facet entries change. Until the index
/// updates finish, a reader can see the new record alongside the previous
/// record's facet entries. Writes that bypass the catalog only ever add to
/// facet entries, so ids of changed or deleted records linger there.
///
/// Puts are not serialized per id. Two concurrent puts of one id with
/// different values can both read the same previous record, and each then
/// adds the id under its own value without removing the other. The id stays
/// in both facet entries until a later put or delete of that id replaces
/// them.
pub struct Catalog {
    records: RecordStore,
    indexes: Vec<Arc<dyn FacetSearch>>,
}

impl Catalog {
    pub fn new(records: RecordStore) -> Self {
        Self {
            records,
            indexes: Vec::new(),
        }
    }

    /// Attaches an index. Records already stored are not back-filled.
    #[must_use]
    pub fn with_index(mut self, index: Arc<dyn FacetSearch>) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// The attached index with this name (`"fs"`, `"hfs"`, ...).
    pub fn index(&self, name: &str) -> Option<&Arc<dyn FacetSearch>> {
        self.indexes.iter().find(|i| i.name() == name)
    }

    pub fn index_names(&self) -> Vec<&str> {
        self.indexes.iter().map(|i| i.name()).collect()
    }

    /// Stores `record` and moves its id to the facet entries of its current
    /// attribute values.
    pub async fn put(&self, record: &Record) -> StoreResult<()> {
        let previous = self.previous(record.id()).await?;
        self.records.put(record).await?;
        for index in &self.indexes {
            index.reindex(record.id(), previous.as_ref(), record).await?;
        }
        debug!("catalog put {} {}", self.records.entity_type(), record.id());
        Ok(())
    }

    /// Deletes the record and drops its id from every facet entry.
    /// Returns whether the record existed.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let previous = self.previous(id).await?;
        let existed = self.records.delete(id).await?;
        if let Some(previous) = previous {
            for index in &self.indexes {
                index.unindex(id, &previous).await?;
            }
        }
        Ok(existed)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Record> {
        self.records.get_by_id(id).await
    }

    /// Facet query against the named index.
    pub async fn query(&self, name: &str, predicates: &[Predicate]) -> StoreResult<HashSet<String>> {
        let index = self
            .index(name)
            .ok_or_else(|| StoreError::UnknownIndex(name.to_string()))?;
        index.query(predicates).await
    }

    /// Scan-and-filter search over all records, ignoring the indexes.
    pub async fn search_greedy(&self, predicates: &[Predicate]) -> StoreResult<Vec<String>> {
        search_greedy(&self.records, predicates).await
    }

    async fn previous(&self, id: &str) -> StoreResult<Option<Record>> {
        match self.records.get_by_id(id).await {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(StoreError::Deserialization { key, source }) => {
                warn!("Previous value at {} is undecodable ({}); its facet entries stay", key, source);
                Ok(None)
            }
            Err(StoreError::Malformed { key, reason }) => {
                warn!("Previous value at {} is unreadable ({}); its facet entries stay", key, reason);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
