//! Key-value storage layer for sporedis.
//!
//! Persists records as JSON blobs in a key-value store and exposes the
//! primitives the facet indexes are built from.
//!
//! # Architecture
//!
//! - [`KvStore`] is the backend boundary: SET/GET/DEL, SCAN, and the set
//!   operations SADD/SREM/SINTER/SMEMBERS
//! - [`MemoryStore`] is always available; `RedisStore` needs the `redis`
//!   feature
//! - [`StorePool`] bounds concurrent operations and [`StoreClient`] runs each
//!   primitive under a [`Deadline`]
//! - [`KeyScanner`] enumerates keys page by page
//! - [`RecordStore`] maps records of one entity type onto `<type>:<id>` keys

mod error;
mod glob;
mod kv;
mod memory;
mod pool;
#[cfg(feature = "redis")]
mod redis_store;
mod record_store;
mod scan;

pub use error::{StoreError, StoreResult};
pub use glob::glob_match;
pub use kv::{KvStore, ScanCursor, ScanPage};
pub use memory::MemoryStore;
pub use pool::{
    Deadline, PooledConnection, StoreClient, StoreConfig, StorePool, DEFAULT_OP_TIMEOUT_MS,
    DEFAULT_POOL_SIZE, DEFAULT_SCAN_COUNT,
};
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use record_store::RecordStore;
pub use scan::KeyScanner;

use std::sync::Arc;
use tracing::info;

/// Opens the backend described by `config` and returns a client for it.
///
/// Uses Redis when `redis_url` is set, the in-memory store otherwise. A
/// `redis_url` without the `redis` feature is an error rather than a silent
/// fallback.
pub async fn connect(config: &StoreConfig) -> StoreResult<StoreClient> {
    match &config.redis_url {
        None => {
            info!("Using in-memory store (pool size {})", config.pool_size);
            Ok(StoreClient::from_backend(Arc::new(MemoryStore::new()), config))
        }
        Some(url) => connect_redis(url, config).await,
    }
}

#[cfg(feature = "redis")]
async fn connect_redis(url: &str, config: &StoreConfig) -> StoreResult<StoreClient> {
    let backend = RedisStore::connect(url).await?;
    Ok(StoreClient::from_backend(Arc::new(backend), config))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(url: &str, _config: &StoreConfig) -> StoreResult<StoreClient> {
    Err(StoreError::Unavailable(format!(
        "{url}: built without the `redis` feature"
    )))
}
