//! Redis backend, enabled with the `redis` feature.

use crate::kv::{KvStore, ScanCursor, ScanPage};
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ErrorKind, RedisError};
use std::collections::HashSet;
use tracing::info;

/// A [`KvStore`] backed by a Redis server.
///
/// The connection manager multiplexes requests over one connection and
/// reconnects on failure; the pool in front of it bounds concurrency.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to `url` (e.g. `redis://localhost:6379/0`).
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url).map_err(|e| map_redis_error(url, e))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| map_redis_error(url, e))?;
        info!("Connected to redis at {}", url);
        Ok(Self { conn })
    }
}

/// Classifies a redis error for the operation on `key`.
///
/// Server WRONGTYPE replies and client-side decode failures are about the
/// value at `key`; everything else is treated as a transport failure.
fn map_redis_error(key: &str, err: RedisError) -> StoreError {
    if err.code() == Some("WRONGTYPE") {
        return StoreError::WrongType(key.to_string());
    }
    match err.kind() {
        ErrorKind::TypeError => StoreError::Malformed {
            key: key.to_string(),
            reason: err.to_string(),
        },
        _ => StoreError::Unavailable(err.to_string()),
    }
}

/// SCAN position encoded in a cursor. Tokens are the decimal cursors Redis
/// hands out.
fn scan_position(cursor: &ScanCursor) -> StoreResult<u64> {
    match cursor {
        ScanCursor::Start => Ok(0),
        ScanCursor::Resume(token) => token
            .parse()
            .map_err(|_| StoreError::InvalidCursor(token.clone())),
    }
}

fn decode_utf8(key: &str, bytes: Vec<u8>) -> StoreResult<String> {
    String::from_utf8(bytes).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl KvStore for RedisStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await.map_err(|e| map_redis_error(key, e))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let bytes: Option<Vec<u8>> = conn.get(key).await.map_err(|e| map_redis_error(key, e))?;
        bytes.map(|b| decode_utf8(key, b)).transpose()
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await.map_err(|e| map_redis_error(key, e))?;
        Ok(removed > 0)
    }

    async fn scan(&self, pattern: &str, cursor: ScanCursor, count: usize) -> StoreResult<ScanPage> {
        let position = scan_position(&cursor)?;
        let mut conn = self.conn.clone();
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(position)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error(pattern, e))?;
        let next = (next != 0).then(|| ScanCursor::Resume(next.to_string()));
        Ok(ScanPage { keys, next })
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let added: i64 = conn.sadd(key, member).await.map_err(|e| map_redis_error(key, e))?;
        Ok(added > 0)
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.srem(key, member).await.map_err(|e| map_redis_error(key, e))?;
        Ok(removed > 0)
    }

    async fn sinter(&self, keys: &[String]) -> StoreResult<HashSet<String>> {
        if keys.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.conn.clone();
        conn.sinter(keys.to_vec())
            .await
            .map_err(|e| map_redis_error(&keys.join(" "), e))
    }

    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        let mut conn = self.conn.clone();
        conn.smembers(key).await.map_err(|e| map_redis_error(key, e))
    }
}
