//! The primitive store contract.
//!
//! `PrimitiveStore` names the native operations of a Redis-style key-value
//! store, one method per command. Any backend that offers hashes, lists,
//! sets and sorted sets with these semantics can host the catalog.
//!
//! Semantics every implementation must honor:
//! - A key holds one kind of primitive; using it as another kind is
//!   `StoreError::WrongType`.
//! - Reading a missing key yields the empty value (no fields, no members).
//! - A collection emptied by a removal ceases to exist.
//! - Sorted sets use one shared score, so `zrange_lex` is plain lexical order.

use async_trait::async_trait;

use crate::error::StoreResult;

/// Async interface over the store's native primitives.
///
/// Every call is a single round trip touching a single key. There is no
/// multi-key atomicity.
#[async_trait]
pub trait PrimitiveStore: Send + Sync {
    /// Check that the store answers.
    async fn ping(&self) -> StoreResult<()>;

    /// Delete a key of any kind. Returns whether it existed.
    async fn del(&self, key: &str) -> StoreResult<bool>;

    // =========================================================================
    // Hashes
    // =========================================================================

    /// Field names of a hash (`HKEYS`).
    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Field values of a hash, in field order (`HVALS`).
    async fn hvals(&self, key: &str) -> StoreResult<Vec<String>>;

    /// One field of a hash (`HGET`).
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// Write several fields of a hash (`HSET`). Returns the number of new fields.
    async fn hset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<usize>;

    /// Remove one field of a hash (`HDEL`). Returns whether it existed.
    async fn hdel(&self, key: &str, field: &str) -> StoreResult<bool>;

    // =========================================================================
    // Lists
    // =========================================================================

    /// Append to a list (`RPUSH`). Returns the new length.
    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize>;

    /// Every element of a list (`LRANGE key 0 -1`).
    async fn lrange(&self, key: &str) -> StoreResult<Vec<String>>;

    // =========================================================================
    // Sets
    // =========================================================================

    /// Add a member (`SADD`). Returns whether it was new.
    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Remove a member (`SREM`). Returns whether it was present.
    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// All members (`SMEMBERS`), in lexical order.
    async fn smembers(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Member count (`SCARD`).
    async fn scard(&self, key: &str) -> StoreResult<usize>;

    // =========================================================================
    // Sorted sets
    // =========================================================================

    /// Add a member with the shared score (`ZADD`). Returns whether it was new.
    async fn zadd(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Remove a member (`ZREM`). Returns whether it was present.
    async fn zrem(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// All members in lexical order (`ZRANGEBYLEX key - +`).
    async fn zrange_lex(&self, key: &str) -> StoreResult<Vec<String>>;
}
