//! In-process primitive store
//!
//! A single keyspace of Redis-style primitives held in a DashMap.
//!
//! # Design
//!
//! - DashMap: sharded, lock-free reads, writes lock only the target shard
//! - FxHash: fast non-crypto hashing for string keys
//! - BTree collections: members and fields iterate in lexical order, which
//!   gives listings a deterministic order and makes sorted sets free
//!
//! Every command touches exactly one key, so there is no cross-key locking.
//! A removal that empties a collection deletes the key, as Redis does.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::traits::PrimitiveStore;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Value held under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub(crate) enum Entry {
    Hash(BTreeMap<String, String>),
    List(Vec<String>),
    Set(BTreeSet<String>),
    SortedSet(BTreeSet<String>),
}

fn wrong_type(key: &str, expected: &'static str) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
        expected,
    }
}

impl Entry {
    fn is_empty(&self) -> bool {
        match self {
            Entry::Hash(h) => h.is_empty(),
            Entry::List(l) => l.is_empty(),
            Entry::Set(s) | Entry::SortedSet(s) => s.is_empty(),
        }
    }

    fn hash(&self, key: &str) -> StoreResult<&BTreeMap<String, String>> {
        match self {
            Entry::Hash(h) => Ok(h),
            _ => Err(wrong_type(key, "hash")),
        }
    }

    fn hash_mut(&mut self, key: &str) -> StoreResult<&mut BTreeMap<String, String>> {
        match self {
            Entry::Hash(h) => Ok(h),
            _ => Err(wrong_type(key, "hash")),
        }
    }

    fn list(&self, key: &str) -> StoreResult<&Vec<String>> {
        match self {
            Entry::List(l) => Ok(l),
            _ => Err(wrong_type(key, "list")),
        }
    }

    fn list_mut(&mut self, key: &str) -> StoreResult<&mut Vec<String>> {
        match self {
            Entry::List(l) => Ok(l),
            _ => Err(wrong_type(key, "list")),
        }
    }

    fn set(&self, key: &str) -> StoreResult<&BTreeSet<String>> {
        match self {
            Entry::Set(s) => Ok(s),
            _ => Err(wrong_type(key, "set")),
        }
    }

    fn set_mut(&mut self, key: &str) -> StoreResult<&mut BTreeSet<String>> {
        match self {
            Entry::Set(s) => Ok(s),
            _ => Err(wrong_type(key, "set")),
        }
    }

    fn sorted_set(&self, key: &str) -> StoreResult<&BTreeSet<String>> {
        match self {
            Entry::SortedSet(s) => Ok(s),
            _ => Err(wrong_type(key, "sorted set")),
        }
    }

    fn sorted_set_mut(&mut self, key: &str) -> StoreResult<&mut BTreeSet<String>> {
        match self {
            Entry::SortedSet(s) => Ok(s),
            _ => Err(wrong_type(key, "sorted set")),
        }
    }
}

/// In-memory primitive store.
///
/// # Thread Safety
///
/// All commands are safe to call concurrently. Each one locks at most the
/// shard of the key it touches, so a multi-key sequence issued by a caller
/// can interleave with another caller's sequence.
///
/// # Example
///
/// ```ignore
/// use stacks_storage::{MemoryStore, PrimitiveStore};
///
/// let store = MemoryStore::new();
/// store.sadd("books-by-Herbert", "111").await?;
/// assert_eq!(store.scard("books-by-Herbert").await?, 1);
/// ```
pub struct MemoryStore {
    entries: DashMap<String, Entry, FxBuildHasher>,
    /// Bumped on every mutation
    version: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher::default()),
            version: AtomicU64::new(0),
        }
    }

    /// Create an empty store with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            version: AtomicU64::new(0),
        }
    }

    pub(crate) fn from_entries(entries: BTreeMap<String, Entry>) -> Self {
        let store = Self::with_capacity(entries.len());
        for (key, entry) in entries {
            if !entry.is_empty() {
                store.entries.insert(key, entry);
            }
        }
        store
    }

    pub(crate) fn entries_snapshot(&self) -> BTreeMap<String, Entry> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Number of mutations applied since creation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    #[inline]
    fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of live keys.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// All live keys in lexical order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Check whether a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn prune(&self, key: &str) {
        self.entries.remove_if(key, |_, entry| entry.is_empty());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("key_count", &self.key_count())
            .field("version", &self.version())
            .finish()
    }
}

#[async_trait]
impl PrimitiveStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.bump_version();
        }
        Ok(existed)
    }

    // ========================================================================
    // Hashes
    // ========================================================================

    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.hash(key)?.keys().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    async fn hvals(&self, key: &str) -> StoreResult<Vec<String>> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.hash(key)?.values().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.hash(key)?.get(field).cloned()),
            None => Ok(None),
        }
    }

    async fn hset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<usize> {
        if pairs.is_empty() {
            return Ok(0);
        }
        let added = {
            let mut entry = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| Entry::Hash(BTreeMap::new()));
            let hash = entry.hash_mut(key)?;
            pairs
                .iter()
                .filter(|(field, value)| hash.insert(field.clone(), value.clone()).is_none())
                .count()
        };
        self.bump_version();
        Ok(added)
    }

    async fn hdel(&self, key: &str, field: &str) -> StoreResult<bool> {
        let removed = match self.entries.get_mut(key) {
            Some(mut entry) => entry.hash_mut(key)?.remove(field).is_some(),
            None => false,
        };
        if removed {
            self.prune(key);
            self.bump_version();
        }
        Ok(removed)
    }

    // ========================================================================
    // Lists
    // ========================================================================

    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize> {
        let len = {
            let mut entry = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| Entry::List(Vec::new()));
            let list = entry.list_mut(key)?;
            list.push(value.to_string());
            list.len()
        };
        self.bump_version();
        Ok(len)
    }

    async fn lrange(&self, key: &str) -> StoreResult<Vec<String>> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.list(key)?.clone()),
            None => Ok(Vec::new()),
        }
    }

    // ========================================================================
    // Sets
    // ========================================================================

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let added = {
            let mut entry = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| Entry::Set(BTreeSet::new()));
            entry.set_mut(key)?.insert(member.to_string())
        };
        if added {
            self.bump_version();
        }
        Ok(added)
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let removed = match self.entries.get_mut(key) {
            Some(mut entry) => entry.set_mut(key)?.remove(member),
            None => false,
        };
        if removed {
            self.prune(key);
            self.bump_version();
        }
        Ok(removed)
    }

    async fn smembers(&self, key: &str) -> StoreResult<Vec<String>> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.set(key)?.iter().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    async fn scard(&self, key: &str) -> StoreResult<usize> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.set(key)?.len()),
            None => Ok(0),
        }
    }

    // ========================================================================
    // Sorted sets
    // ========================================================================

    async fn zadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        let added = {
            let mut entry = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| Entry::SortedSet(BTreeSet::new()));
            entry.sorted_set_mut(key)?.insert(member.to_string())
        };
        if added {
            self.bump_version();
        }
        Ok(added)
    }

    async fn zrem(&self, key: &str, member: &str) -> StoreResult<bool> {
        let removed = match self.entries.get_mut(key) {
            Some(mut entry) => entry.sorted_set_mut(key)?.remove(member),
            None => false,
        };
        if removed {
            self.prune(key);
            self.bump_version();
        }
        Ok(removed)
    }

    async fn zrange_lex(&self, key: &str) -> StoreResult<Vec<String>> {
        match self.entries.get(key) {
            Some(entry) => Ok(entry.sorted_set(key)?.iter().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(f, v)| (f.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_store_creation() {
        let store = MemoryStore::new();
        assert_eq!(store.key_count(), 0);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_debug_impl() {
        let store = MemoryStore::with_capacity(16);
        let debug_str = format!("{:?}", store);
        assert!(debug_str.contains("MemoryStore"));
        assert!(debug_str.contains("key_count"));
    }

    #[tokio::test]
    async fn test_hash_set_and_get() {
        let store = MemoryStore::new();
        let added = store
            .hset("book-1", &pairs(&[("name", "Dune"), ("pages", "412")]))
            .await
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(
            store.hget("book-1", "name").await.unwrap(),
            Some("Dune".to_string())
        );
        assert_eq!(store.hget("book-1", "isbn").await.unwrap(), None);
        assert_eq!(store.hget("missing", "name").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hash_overwrite_counts_only_new_fields() {
        let store = MemoryStore::new();
        store.hset("h", &pairs(&[("a", "1")])).await.unwrap();
        let added = store
            .hset("h", &pairs(&[("a", "2"), ("b", "3")]))
            .await
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.hget("h", "a").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_hash_keys_and_values_in_field_order() {
        let store = MemoryStore::new();
        store
            .hset("borrowed-by-sam", &pairs(&[("222", "Emma"), ("111", "Dune")]))
            .await
            .unwrap();
        assert_eq!(store.hkeys("borrowed-by-sam").await.unwrap(), vec!["111", "222"]);
        assert_eq!(store.hvals("borrowed-by-sam").await.unwrap(), vec!["Dune", "Emma"]);
    }

    #[tokio::test]
    async fn test_hdel_last_field_removes_key() {
        let store = MemoryStore::new();
        store.hset("borrowing", &pairs(&[("111", "sam")])).await.unwrap();
        assert!(store.hdel("borrowing", "111").await.unwrap());
        assert!(!store.contains("borrowing"));
        assert!(!store.hdel("borrowing", "111").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_hset_does_not_create_key() {
        let store = MemoryStore::new();
        assert_eq!(store.hset("h", &[]).await.unwrap(), 0);
        assert!(!store.contains("h"));
    }

    #[tokio::test]
    async fn test_list_append_preserves_order() {
        let store = MemoryStore::new();
        assert_eq!(store.rpush("authors-1", "Pratchett").await.unwrap(), 1);
        assert_eq!(store.rpush("authors-1", "Gaiman").await.unwrap(), 2);
        assert_eq!(
            store.lrange("authors-1").await.unwrap(),
            vec!["Pratchett", "Gaiman"]
        );
        assert!(store.lrange("authors-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_membership() {
        let store = MemoryStore::new();
        assert!(store.sadd("s", "b").await.unwrap());
        assert!(store.sadd("s", "a").await.unwrap());
        assert!(!store.sadd("s", "a").await.unwrap());
        assert_eq!(store.scard("s").await.unwrap(), 2);
        assert_eq!(store.smembers("s").await.unwrap(), vec!["a", "b"]);

        assert!(store.srem("s", "a").await.unwrap());
        assert!(!store.srem("s", "a").await.unwrap());
        assert!(store.srem("s", "b").await.unwrap());
        assert_eq!(store.scard("s").await.unwrap(), 0);
        assert!(!store.contains("s"));
    }

    #[tokio::test]
    async fn test_sorted_set_is_lexical() {
        let store = MemoryStore::new();
        for page in ["96", "412", "1000"] {
            store.zadd("page-counts", page).await.unwrap();
        }
        assert!(!store.zadd("page-counts", "412").await.unwrap());
        assert_eq!(
            store.zrange_lex("page-counts").await.unwrap(),
            vec!["1000", "412", "96"]
        );
        assert!(store.zrem("page-counts", "412").await.unwrap());
        assert_eq!(store.zrange_lex("page-counts").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_wrong_type() {
        let store = MemoryStore::new();
        store.sadd("s", "a").await.unwrap();
        let err = store.hget("s", "a").await.unwrap_err();
        assert!(matches!(err, StoreError::WrongType { expected: "hash", .. }));
        assert!(store.zadd("s", "a").await.is_err());
        assert!(store.rpush("s", "a").await.is_err());
        // The failed call must not have replaced the set
        assert_eq!(store.scard("s").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_del_any_kind() {
        let store = MemoryStore::new();
        store.rpush("l", "x").await.unwrap();
        assert!(store.del("l").await.unwrap());
        assert!(!store.del("l").await.unwrap());
    }

    #[tokio::test]
    async fn test_version_counts_mutations_only() {
        let store = MemoryStore::new();
        store.sadd("s", "a").await.unwrap();
        store.sadd("s", "a").await.unwrap();
        store.smembers("s").await.unwrap();
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn test_keys_sorted() {
        let store = MemoryStore::new();
        store.sadd("b", "1").await.unwrap();
        store.sadd("a", "1").await.unwrap();
        assert_eq!(store.keys(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_to_distinct_keys() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    for i in 0..50 {
                        store
                            .sadd(&format!("set-{}", t), &i.to_string())
                            .await
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.key_count(), 8);
        assert_eq!(store.scard("set-3").await.unwrap(), 50);
    }
}
