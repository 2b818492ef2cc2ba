//! Reference-counted secondary indexes.
//!
//! A secondary index is a sorted set of distinct values (`parent`) plus one
//! member set per value. A value is listed in the parent iff its member set
//! is non-empty:
//!
//! ```text
//! authors                -> { "Gaiman", "Herbert", "Pratchett" }
//! books-by-Herbert       -> { "111" }
//! books-by-Pratchett     -> { "222", "333" }
//! ```
//!
//! # Design
//!
//! - Adding a reference writes the member first, then the parent value.
//!   Re-adding either is a no-op, so the add is idempotent.
//! - Removing a reference removes the member, then reads the member set's
//!   size. Only a size of exactly zero retires the parent value.
//! - When the size cannot be read the parent value is kept. An orphaned value
//!   shows up in the integrity audit; a hidden live value would not.

use stacks_core::keys::{
    books_by_key, books_named_key, books_with_pages_key, usernames_key, AUTHORS, BOOK_NAMES,
    BORROWER_NAMES, PAGE_COUNTS,
};
use stacks_storage::StoreAdapter;
use tracing::debug;

/// One reference-counted index: a parent sorted set and its member sets.
#[derive(Debug, Clone, Copy)]
pub struct RefCountedIndex {
    /// Human name used in logs and audit reports
    pub label: &'static str,
    /// Key of the sorted set of distinct values
    pub parent: &'static str,
    members_key: fn(&str) -> String,
}

/// Book name -> isbns
pub const NAME_INDEX: RefCountedIndex = RefCountedIndex {
    label: "book name",
    parent: BOOK_NAMES,
    members_key: books_named_key,
};

/// Author -> isbns
pub const AUTHOR_INDEX: RefCountedIndex = RefCountedIndex {
    label: "author",
    parent: AUTHORS,
    members_key: books_by_key,
};

/// Page count -> isbns
pub const PAGE_INDEX: RefCountedIndex = RefCountedIndex {
    label: "page count",
    parent: PAGE_COUNTS,
    members_key: books_with_pages_key,
};

/// Borrower name -> usernames
pub const BORROWER_NAME_INDEX: RefCountedIndex = RefCountedIndex {
    label: "borrower name",
    parent: BORROWER_NAMES,
    members_key: usernames_key,
};

impl RefCountedIndex {
    /// Key of the member set for `value`.
    pub fn members_key(&self, value: &str) -> String {
        (self.members_key)(value)
    }

    /// Record that `member` carries `value`. Returns false if either write failed.
    pub async fn add_reference(&self, store: &StoreAdapter, value: &str, member: &str) -> bool {
        let member_added = store.add_to_set(&self.members_key(value), member).await;
        let value_added = store.add_to_sorted_index(self.parent, value).await;
        debug!(target: "stacks::index", index = self.label, value, member, "Added reference");
        member_added && value_added
    }

    /// Drop the reference from `member` to `value`, retiring `value` from the
    /// parent when no member is left.
    ///
    /// Returns false if a write failed. An unknown remaining size is not a
    /// failure: the value stays in the parent.
    pub async fn remove_reference(&self, store: &StoreAdapter, value: &str, member: &str) -> bool {
        let members_key = self.members_key(value);
        if !store.remove_from_set(&members_key, member).await {
            return false;
        }

        match store.set_size(&members_key).await {
            Some(0) => {
                debug!(target: "stacks::index", index = self.label, value, "Last reference gone, retiring value");
                store.remove_from_sorted_index(self.parent, value).await
            }
            Some(_) => true,
            None => {
                debug!(target: "stacks::index", index = self.label, value, "Reference count unknown, keeping value");
                true
            }
        }
    }

    /// Members carrying `value`.
    pub async fn members(&self, store: &StoreAdapter, value: &str) -> Vec<String> {
        store.set_members(&self.members_key(value)).await
    }

    /// Distinct values in lexical order.
    pub async fn values(&self, store: &StoreAdapter) -> Vec<String> {
        store.sorted_index_values(self.parent).await
    }
}
