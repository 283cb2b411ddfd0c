//! In-process backend.
//!
//! Keeps strings and sets in one ordered keyspace so scans walk keys in a
//! stable order and a resume token is simply the last key examined.

use crate::glob::glob_match;
use crate::kv::{KvStore, ScanCursor, ScanPage};
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Set(HashSet<String>),
}

/// A [`KvStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keyspace: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored, strings and sets alike.
    pub async fn len(&self) -> usize {
        self.keyspace.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keyspace.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.keyspace
            .write()
            .await
            .insert(key.to_string(), Value::Str(value.to_string()));
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.keyspace.read().await.get(key) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(Value::Set(_)) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        Ok(self.keyspace.write().await.remove(key).is_some())
    }

    async fn scan(&self, pattern: &str, cursor: ScanCursor, count: usize) -> StoreResult<ScanPage> {
        let keyspace = self.keyspace.read().await;
        let lower = match &cursor {
            ScanCursor::Start => Bound::Unbounded,
            ScanCursor::Resume(last) => Bound::Excluded(last.as_str()),
        };
        let budget = count.max(1);

        let mut keys = Vec::new();
        let mut examined = 0;
        let mut last_examined = None;
        let mut range = keyspace.range::<str, _>((lower, Bound::Unbounded));
        for (key, _) in range.by_ref() {
            examined += 1;
            if glob_match(pattern, key) {
                keys.push(key.clone());
            }
            if examined == budget {
                last_examined = Some(key.clone());
                break;
            }
        }

        let next = match last_examined {
            Some(last) if range.next().is_some() => Some(ScanCursor::Resume(last)),
            _ => None,
        };
        Ok(ScanPage { keys, next })
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut keyspace = self.keyspace.write().await;
        let entry = keyspace
            .entry(key.to_string())
            .or_insert_with(|| Value::Set(HashSet::new()));
        match entry {
            Value::Set(members) => Ok(members.insert(member.to_string())),
            Value::Str(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut keyspace = self.keyspace.write().await;
        let (removed, now_empty) = match keyspace.get_mut(key) {
            None => return Ok(false),
            Some(Value::Str(_)) => return Err(StoreError::WrongType(key.to_string())),
            Some(Value::Set(members)) => (members.remove(member), members.is_empty()),
        };
        if now_empty {
            keyspace.remove(key);
        }
        Ok(removed)
    }

    async fn sinter(&self, keys: &[String]) -> StoreResult<HashSet<String>> {
        let keyspace = self.keyspace.read().await;
        let mut sets = Vec::with_capacity(keys.len());
        for key in keys {
            match keyspace.get(key) {
                None => return Ok(HashSet::new()),
                Some(Value::Str(_)) => return Err(StoreError::WrongType(key.clone())),
                Some(Value::Set(members)) => sets.push(members),
            }
        }

        // Start from the smallest set.
        sets.sort_by_key(|s| s.len());
        let Some((smallest, others)) = sets.split_first() else {
            return Ok(HashSet::new());
        };
        Ok(smallest
            .iter()
            .filter(|m| others.iter().all(|s| s.contains(*m)))
            .cloned()
            .collect())
    }

    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        match self.keyspace.read().await.get(key) {
            None => Ok(HashSet::new()),
            Some(Value::Set(members)) => Ok(members.clone()),
            Some(Value::Str(_)) => Err(StoreError::WrongType(key.to_string())),
        }
    }
}
