//! Redis backend.
//!
//! Each `PrimitiveStore` call maps to exactly one Redis command, so data
//! written here uses the same key layout as any other client of the
//! catalog. Sorted sets are written with the shared score 1 and read back
//! with `ZRANGEBYLEX - +`.
//!
//! The connection is a [`ConnectionManager`], which reconnects on its own
//! after a dropped connection. A call made while the server is away fails
//! with `StoreError::Unavailable`; the adapter decides what that means.

use std::collections::BTreeMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::traits::PrimitiveStore;

/// Score shared by every sorted-set member.
const SHARED_SCORE: i64 = 1;

/// Translate a client error, recognizing Redis's WRONGTYPE reply.
fn store_error(key: &str, expected: &'static str, err: RedisError) -> StoreError {
    if err.code() == Some("WRONGTYPE") {
        StoreError::WrongType {
            key: key.to_string(),
            expected,
        }
    } else {
        StoreError::unavailable(err.to_string())
    }
}

/// `PrimitiveStore` over a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to `url` (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::unavailable(format!("invalid Redis url: {}", e)))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        info!(target: "stacks::store", "Connected to Redis");
        Ok(Self { conn })
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl PrimitiveStore for RedisStore {
    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("", "server", e))?;
        Ok(())
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        let removed: usize = self
            .conn()
            .del(key)
            .await
            .map_err(|e| store_error(key, "key", e))?;
        Ok(removed > 0)
    }

    // ========================================================================
    // Hashes
    // ========================================================================

    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut fields: Vec<String> = self
            .conn()
            .hkeys(key)
            .await
            .map_err(|e| store_error(key, "hash", e))?;
        fields.sort();
        Ok(fields)
    }

    async fn hvals(&self, key: &str) -> StoreResult<Vec<String>> {
        // HVALS follows the server's field order; read the pairs so values
        // come back in lexical field order like the other backends
        let pairs: BTreeMap<String, String> = self
            .conn()
            .hgetall(key)
            .await
            .map_err(|e| store_error(key, "hash", e))?;
        Ok(pairs.into_values().collect())
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.conn()
            .hget(key, field)
            .await
            .map_err(|e| store_error(key, "hash", e))
    }

    async fn hset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<usize> {
        if pairs.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn();
        redis::cmd("HSET")
            .arg(key)
            .arg(pairs)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error(key, "hash", e))
    }

    async fn hdel(&self, key: &str, field: &str) -> StoreResult<bool> {
        let removed: usize = self
            .conn()
            .hdel(key, field)
            .await
            .map_err(|e| store_error(key, "hash", e))?;
        Ok(removed > 0)
    }

    // ========================================================================
    // Lists
    // ========================================================================

    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize> {
        self.conn()
            .rpush(key, value)
            .await
            .map_err(|e| store_error(key, "list", e))
    }

    async fn lrange(&self, key: &str) -> StoreResult<Vec<String>> {
        self.conn()
            .lrange(key, 0, -1)
            .await
            .map_err(|e| store_error(key, "list", e))
    }

    // ========================================================================
    // Sets
    // ========================================================================

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let added: usize = self
            .conn()
            .sadd(key, member)
            .await
            .map_err(|e| store_error(key, "set", e))?;
        Ok(added > 0)
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let removed: usize = self
            .conn()
            .srem(key, member)
            .await
            .map_err(|e| store_error(key, "set", e))?;
        Ok(removed > 0)
    }

    async fn smembers(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut members: Vec<String> = self
            .conn()
            .smembers(key)
            .await
            .map_err(|e| store_error(key, "set", e))?;
        members.sort();
        Ok(members)
    }

    async fn scard(&self, key: &str) -> StoreResult<usize> {
        self.conn()
            .scard(key)
            .await
            .map_err(|e| store_error(key, "set", e))
    }

    // ========================================================================
    // Sorted sets
    // ========================================================================

    async fn zadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let added: usize = self
            .conn()
            .zadd(key, member, SHARED_SCORE)
            .await
            .map_err(|e| store_error(key, "sorted set", e))?;
        Ok(added > 0)
    }

    async fn zrem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let removed: usize = self
            .conn()
            .zrem(key, member)
            .await
            .map_err(|e| store_error(key, "sorted set", e))?;
        Ok(removed > 0)
    }

    async fn zrange_lex(&self, key: &str) -> StoreResult<Vec<String>> {
        self.conn()
            .zrangebylex(key, "-", "+")
            .await
            .map_err(|e| store_error(key, "sorted set", e))
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}
