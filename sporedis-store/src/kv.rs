//! The key-value boundary every backend implements.

use crate::StoreResult;
use async_trait::async_trait;
use std::collections::HashSet;

/// Position of an incremental key scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCursor {
    /// Begin a new scan.
    Start,
    /// Continue from a backend-specific token returned by a previous page.
    Resume(String),
}

/// One page of an incremental key scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Keys matching the pattern in this page. May be empty even when the
    /// scan is not finished.
    pub keys: Vec<String>,
    /// Cursor for the next page, `None` once the keyspace is exhausted.
    pub next: Option<ScanCursor>,
}

/// Primitive operations of the backing store.
///
/// Strings and sets share one keyspace. Reading a key through the wrong
/// family of operations fails with [`crate::StoreError::WrongType`].
#[async_trait]
pub trait KvStore: Send + Sync {
    /// SET: stores `value` at `key`, replacing whatever was there.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// GET: the string at `key`, `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// DEL: removes `key`. Returns whether it existed.
    async fn del(&self, key: &str) -> StoreResult<bool>;

    /// SCAN: one page of keys matching the glob `pattern`.
    ///
    /// `count` is a hint for how much of the keyspace to examine per page.
    /// A key may be reported more than once across pages.
    async fn scan(&self, pattern: &str, cursor: ScanCursor, count: usize) -> StoreResult<ScanPage>;

    /// SADD: adds `member` to the set at `key`. Returns whether it was new.
    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// SREM: removes `member` from the set at `key`. Returns whether it was
    /// present. Empty sets are deleted.
    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// SINTER: members present in every set in `keys`. Missing keys count as
    /// empty sets.
    async fn sinter(&self, keys: &[String]) -> StoreResult<HashSet<String>>;

    /// SMEMBERS: all members of the set at `key`.
    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>>;
}
