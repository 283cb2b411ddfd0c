//! Connection pooling and per-operation deadlines.
//!
//! Every call through [`StoreClient`] acquires a pooled connection, runs one
//! primitive and releases the connection when the call returns, fails or is
//! dropped. Acquisition waits count against the call's deadline.

use crate::kv::{KvStore, ScanCursor, ScanPage};
use crate::memory::MemoryStore;
use crate::scan::KeyScanner;
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Default number of concurrent connections.
pub const DEFAULT_POOL_SIZE: usize = 8;
/// Default per-operation timeout.
pub const DEFAULT_OP_TIMEOUT_MS: u64 = 5_000;
/// Default SCAN COUNT hint.
pub const DEFAULT_SCAN_COUNT: usize = 100;

/// Configuration for the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum concurrent operations against the backend.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Per-operation timeout (ms). Zero disables the deadline.
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
    /// Keys examined per scan page.
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,
    /// Redis URL. When unset the in-memory backend is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_op_timeout_ms() -> u64 {
    DEFAULT_OP_TIMEOUT_MS
}

fn default_scan_count() -> usize {
    DEFAULT_SCAN_COUNT
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            op_timeout_ms: DEFAULT_OP_TIMEOUT_MS,
            scan_count: DEFAULT_SCAN_COUNT,
            redis_url: None,
        }
    }
}

impl StoreConfig {
    /// The deadline applied to each operation by default.
    pub fn op_deadline(&self) -> Deadline {
        if self.op_timeout_ms == 0 {
            Deadline::Never
        } else {
            Deadline::After(Duration::from_millis(self.op_timeout_ms))
        }
    }
}

/// When a store operation must give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// No time limit.
    Never,
    /// Each operation gets this long, measured from when it starts.
    After(Duration),
    /// All operations share one absolute cutoff.
    At(Instant),
}

impl Deadline {
    /// A shared cutoff `timeout` from now.
    pub fn within(timeout: Duration) -> Self {
        Self::At(Instant::now() + timeout)
    }

    fn instant(self) -> Option<Instant> {
        match self {
            Self::Never => None,
            Self::After(d) => Some(Instant::now() + d),
            Self::At(at) => Some(at),
        }
    }

    /// Runs `fut` to completion or fails with [`StoreError::Timeout`].
    pub async fn run<T, F>(self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match self.instant() {
            None => fut.await,
            Some(at) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| StoreError::Timeout)?,
        }
    }
}

/// A bounded pool of connections to one backend.
pub struct StorePool {
    backend: Arc<dyn KvStore>,
    slots: Arc<Semaphore>,
    size: usize,
}

impl StorePool {
    /// Creates a pool admitting at most `size` concurrent operations.
    ///
    /// `size` is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(backend: Arc<dyn KvStore>, size: usize) -> Self {
        let size = size.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            backend,
            slots: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots not currently checked out.
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Waits for a free slot.
    pub async fn acquire(&self) -> StoreResult<PooledConnection> {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| StoreError::Unavailable("connection pool closed".into()))?;
        Ok(PooledConnection {
            conn: Arc::clone(&self.backend),
            _permit: permit,
        })
    }

    /// Stops handing out connections. Pending and future acquisitions fail
    /// with [`StoreError::Unavailable`].
    pub fn close(&self) {
        self.slots.close();
    }
}

/// A checked-out connection. The slot returns to the pool on drop.
pub struct PooledConnection {
    conn: Arc<dyn KvStore>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = dyn KvStore;

    fn deref(&self) -> &Self::Target {
        self.conn.as_ref()
    }
}

/// Cheap, cloneable handle for issuing store primitives under a deadline.
#[derive(Clone)]
pub struct StoreClient {
    pool: Arc<StorePool>,
    deadline: Deadline,
    scan_count: usize,
}

impl StoreClient {
    pub fn new(pool: Arc<StorePool>, config: &StoreConfig) -> Self {
        Self {
            pool,
            deadline: config.op_deadline(),
            scan_count: config.scan_count.max(1),
        }
    }

    /// Builds a client over `backend` with a fresh pool.
    pub fn from_backend(backend: Arc<dyn KvStore>, config: &StoreConfig) -> Self {
        Self::new(Arc::new(StorePool::new(backend, config.pool_size)), config)
    }

    /// Builds a client over an empty [`MemoryStore`].
    pub fn in_memory(config: &StoreConfig) -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()), config)
    }

    /// A handle sharing this pool but using `deadline` for its operations.
    #[must_use]
    pub fn with_deadline(&self, deadline: Deadline) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            deadline,
            scan_count: self.scan_count,
        }
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn pool(&self) -> &Arc<StorePool> {
        &self.pool
    }

    pub fn scan_count(&self) -> usize {
        self.scan_count
    }

    pub async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.set(key, value).await
            })
            .await
    }

    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.get(key).await
            })
            .await
    }

    pub async fn del(&self, key: &str) -> StoreResult<bool> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.del(key).await
            })
            .await
    }

    pub async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.sadd(key, member).await
            })
            .await
    }

    pub async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.srem(key, member).await
            })
            .await
    }

    pub async fn sinter(&self, keys: &[String]) -> StoreResult<HashSet<String>> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.sinter(keys).await
            })
            .await
    }

    pub async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.smembers(key).await
            })
            .await
    }

    /// Fetches a single scan page.
    pub async fn scan_page(&self, pattern: &str, cursor: ScanCursor) -> StoreResult<ScanPage> {
        self.deadline
            .run(async {
                let conn = self.pool.acquire().await?;
                conn.scan(pattern, cursor, self.scan_count).await
            })
            .await
    }

    /// Starts a resumable scan over keys matching `pattern`.
    pub fn scan(&self, pattern: impl Into<String>) -> KeyScanner {
        KeyScanner::new(self.clone(), pattern.into())
    }
}
