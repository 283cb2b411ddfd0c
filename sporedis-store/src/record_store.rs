//! Whole-record persistence keyed by entity type and id.

use crate::pool::{Deadline, StoreClient};
use crate::scan::KeyScanner;
use crate::{StoreError, StoreResult};
use sporedis_keys::KeyNamer;
use sporedis_model::{Record, RecordSchema};
use std::sync::Arc;
use tracing::{debug, warn};

/// Stores records of one entity type as JSON blobs at `<type>:<id>`.
#[derive(Clone)]
pub struct RecordStore {
    schema: Arc<RecordSchema>,
    namer: KeyNamer,
    client: StoreClient,
}

impl RecordStore {
    pub fn new(schema: RecordSchema, namer: KeyNamer, client: StoreClient) -> Self {
        Self {
            schema: Arc::new(schema),
            namer,
            client,
        }
    }

    /// A handle on the same records whose operations use `deadline`.
    #[must_use]
    pub fn with_deadline(&self, deadline: Deadline) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            namer: self.namer.clone(),
            client: self.client.with_deadline(deadline),
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn entity_type(&self) -> &str {
        &self.schema.entity_type
    }

    pub fn namer(&self) -> &KeyNamer {
        &self.namer
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// The key a record with this id is stored under. `*` in `id` makes it a
    /// scan pattern.
    pub fn key_for(&self, id: &str) -> String {
        self.namer.make_key([self.entity_type(), id])
    }

    /// Writes the record, replacing any previous value for its id.
    pub async fn put(&self, record: &Record) -> StoreResult<()> {
        let blob = self.schema.encode(record)?;
        let key = self.key_for(record.id());
        self.client.set(&key, &blob).await?;
        debug!("put {}", key);
        Ok(())
    }

    /// Looks up records by id pattern.
    ///
    /// Each id is expanded to a key pattern and every matching key is
    /// fetched, so `get(&["*"])` returns all records of the type. Keys that
    /// vanish mid-scan or hold undecodable values are skipped.
    pub async fn get<S: AsRef<str>>(&self, ids: &[S]) -> StoreResult<Vec<Record>> {
        let patterns: Vec<String> = ids.iter().map(|id| self.key_for(id.as_ref())).collect();
        let mut records = Vec::new();
        for pattern in patterns {
            let mut scanner = self.client.scan(pattern);
            while let Some(keys) = scanner.next_page().await? {
                for key in keys {
                    if let Some(record) = self.get_lenient(&key).await? {
                        records.push(record);
                    }
                }
            }
        }
        Ok(records)
    }

    /// Direct lookup of the record stored at `key`.
    pub async fn get_by_key(&self, key: &str) -> StoreResult<Record> {
        let blob = self
            .client
            .get(key)
            .await?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        self.schema
            .decode(&blob)
            .map_err(|source| StoreError::Deserialization {
                key: key.to_string(),
                source,
            })
    }

    /// Direct lookup by id.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Record> {
        self.get_by_key(&self.key_for(id)).await
    }

    /// Like [`RecordStore::get_by_key`], but absent, unreadable, undecodable
    /// and non-string values become `None`. Transport failures and timeouts
    /// still propagate.
    pub async fn get_lenient(&self, key: &str) -> StoreResult<Option<Record>> {
        match self.get_by_key(key).await {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::NotFound(_)) => {
                debug!("{} disappeared before it was read", key);
                Ok(None)
            }
            Err(StoreError::Deserialization { key, source }) => {
                warn!("Skipping undecodable {} at {}: {}", self.entity_type(), key, source);
                Ok(None)
            }
            Err(StoreError::Malformed { key, reason }) => {
                warn!("Skipping unreadable {} at {}: {}", self.entity_type(), key, reason);
                Ok(None)
            }
            Err(StoreError::WrongType(key)) => {
                warn!("Skipping non-string key {} in {} scan", key, self.entity_type());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Removes the record. Returns whether it existed.
    ///
    /// Facet entries that reference the id are not touched here.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let key = self.key_for(id);
        let existed = self.client.del(&key).await?;
        debug!("delete {} (existed: {})", key, existed);
        Ok(existed)
    }

    /// Scanner over every key of this entity type.
    pub fn scan_all(&self) -> KeyScanner {
        self.client.scan(self.key_for("*"))
    }
}
