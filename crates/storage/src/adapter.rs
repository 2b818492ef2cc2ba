//! Store adapter: the primitive contract the catalog engine consumes.
//!
//! The adapter wraps a [`PrimitiveStore`] and turns every transport error
//! into the conservative answer for that call, so the engine never sees a
//! raw store error:
//!
//! | Call | On transport error |
//! |------|--------------------|
//! | `object_exists` | assume the object exists |
//! | `store_object` / `set_field` | refuse the write |
//! | removals | report failure |
//! | reads | empty / `None` |
//! | `lookup_field` | `Err` (the caller picks the worst case) |
//! | `set_size` | `None` (size unknown) |
//!
//! Removals report success whenever the store answered, whether or not
//! anything was actually removed.
//!
//! Guarded writes (`change_existing = false`) are check-then-act across two
//! round trips. They stop duplicates created by this process, not by a
//! second process writing concurrently.

use std::sync::Arc;

use stacks_core::{StacksError, StacksResult};
use tracing::warn;

use crate::error::StoreResult;
use crate::traits::PrimitiveStore;

/// Conservative facade over a shared primitive store.
///
/// Clone is cheap (just an Arc clone); clones talk to the same store.
#[derive(Clone)]
pub struct StoreAdapter {
    store: Arc<dyn PrimitiveStore>,
}

/// Log a swallowed store error and substitute the fallback.
fn or_assume<T>(op: &'static str, key: &str, result: StoreResult<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(target: "stacks::store", op, key, error = %e, "Store call failed, assuming worst case");
            fallback
        }
    }
}

impl StoreAdapter {
    /// Wrap a store handle.
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn PrimitiveStore> {
        &self.store
    }

    /// Check that the store answers.
    pub async fn ping(&self) -> StacksResult<()> {
        self.store.ping().await.map_err(StacksError::from)
    }

    // =========================================================================
    // Objects (hash records)
    // =========================================================================

    /// Whether a record has any fields. Assumes it exists if the store fails.
    pub async fn object_exists(&self, key: &str) -> bool {
        let fields = self.store.hkeys(key).await.map(|f| !f.is_empty());
        or_assume("object_exists", key, fields, true)
    }

    /// Write a record's fields.
    ///
    /// Refuses (returns false) when the record exists and `change_existing`
    /// is false. This is the only guard against duplicate primary keys.
    pub async fn store_object(
        &self,
        key: &str,
        fields: &[(String, String)],
        change_existing: bool,
    ) -> bool {
        if !change_existing && self.object_exists(key).await {
            return false;
        }
        let written = self.store.hset(key, fields).await.map(|_| true);
        or_assume("store_object", key, written, false)
    }

    /// Delete a key of any kind.
    pub async fn remove_object(&self, key: &str) -> bool {
        let removed = self.store.del(key).await.map(|_| true);
        or_assume("remove_object", key, removed, false)
    }

    /// Read one field of a record.
    pub async fn get_field(&self, key: &str, field: &str) -> Option<String> {
        or_assume("get_field", key, self.store.hget(key, field).await, None)
    }

    /// Read one field of a record, keeping a failed read apart from a
    /// missing field.
    pub async fn lookup_field(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let result = self.store.hget(key, field).await;
        if let Err(e) = &result {
            warn!(target: "stacks::store", op = "lookup_field", key, field, error = %e, "Store call failed");
        }
        result
    }

    /// Write one field of a record.
    ///
    /// Refuses when the field is set (or its presence cannot be checked) and
    /// `change_existing` is false.
    pub async fn set_field(
        &self,
        key: &str,
        field: &str,
        value: &str,
        change_existing: bool,
    ) -> bool {
        if !change_existing {
            let present = self.store.hget(key, field).await.map(|v| v.is_some());
            if or_assume("set_field", key, present, true) {
                return false;
            }
        }
        let pair = [(field.to_string(), value.to_string())];
        let written = self.store.hset(key, &pair).await.map(|_| true);
        or_assume("set_field", key, written, false)
    }

    /// Remove one field of a record.
    pub async fn remove_field(&self, key: &str, field: &str) -> bool {
        let removed = self.store.hdel(key, field).await.map(|_| true);
        or_assume("remove_field", key, removed, false)
    }

    /// Field names of a record.
    pub async fn field_names(&self, key: &str) -> Vec<String> {
        or_assume("field_names", key, self.store.hkeys(key).await, Vec::new())
    }

    /// Field values of a record, in field-name order.
    pub async fn field_values(&self, key: &str) -> Vec<String> {
        or_assume("field_values", key, self.store.hvals(key).await, Vec::new())
    }

    // =========================================================================
    // Sequences (lists)
    // =========================================================================

    /// Append to an ordered sequence.
    pub async fn append_to_sequence(&self, key: &str, value: &str) -> bool {
        let pushed = self.store.rpush(key, value).await.map(|_| true);
        or_assume("append_to_sequence", key, pushed, false)
    }

    /// Read a whole sequence in order.
    pub async fn read_sequence(&self, key: &str) -> Vec<String> {
        or_assume("read_sequence", key, self.store.lrange(key).await, Vec::new())
    }

    // =========================================================================
    // Sets
    // =========================================================================

    /// Add a set member. Re-adding is a successful no-op.
    pub async fn add_to_set(&self, key: &str, value: &str) -> bool {
        let added = self.store.sadd(key, value).await.map(|_| true);
        or_assume("add_to_set", key, added, false)
    }

    /// Remove a set member. Removing an absent member succeeds.
    pub async fn remove_from_set(&self, key: &str, value: &str) -> bool {
        let removed = self.store.srem(key, value).await.map(|_| true);
        or_assume("remove_from_set", key, removed, false)
    }

    /// All members of a set.
    pub async fn set_members(&self, key: &str) -> Vec<String> {
        or_assume("set_members", key, self.store.smembers(key).await, Vec::new())
    }

    /// Member count of a set, or `None` when the store could not say.
    pub async fn set_size(&self, key: &str) -> Option<usize> {
        or_assume("set_size", key, self.store.scard(key).await.map(Some), None)
    }

    // =========================================================================
    // Sorted indexes
    // =========================================================================

    /// Add a value to a lexically ordered index. Re-adding is a no-op.
    pub async fn add_to_sorted_index(&self, key: &str, value: &str) -> bool {
        let added = self.store.zadd(key, value).await.map(|_| true);
        or_assume("add_to_sorted_index", key, added, false)
    }

    /// Remove a value from a sorted index.
    pub async fn remove_from_sorted_index(&self, key: &str, value: &str) -> bool {
        let removed = self.store.zrem(key, value).await.map(|_| true);
        or_assume("remove_from_sorted_index", key, removed, false)
    }

    /// Every value of a sorted index in lexical order.
    pub async fn sorted_index_values(&self, key: &str) -> Vec<String> {
        or_assume(
            "sorted_index_values",
            key,
            self.store.zrange_lex(key).await,
            Vec::new(),
        )
    }
}

impl std::fmt::Debug for StoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreAdapter").finish_non_exhaustive()
    }
}
