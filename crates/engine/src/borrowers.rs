//! Borrower half of the index maintenance engine.
//!
//! A borrower is a `borrower-{username}` record plus one reference in the
//! borrower name index (`usernames` / `usernames-{name}`). The books a
//! borrower holds are mirrored in `borrowed-by-{username}`.

use std::fmt;
use std::str::FromStr;

use stacks_core::keys::{borrowed_by_key, borrower_key, BORROWING, FIELD_NAME, FIELD_PHONE, FIELD_USERNAME};
use stacks_core::{Borrower, EntityRef, StacksError, StacksResult};
use stacks_storage::StoreAdapter;
use tracing::{debug, info, warn};

use crate::index::BORROWER_NAME_INDEX;
use crate::progress::Progress;
use crate::Group;

/// Attribute a borrower search matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowerSearch {
    /// Exact name; several borrowers may share one
    Name,
    /// Exact username
    Username,
}

impl FromStr for BorrowerSearch {
    type Err = StacksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(BorrowerSearch::Name),
            "username" => Ok(BorrowerSearch::Username),
            _ => Err(StacksError::invalid_argument(
                "Invalid search type entered. Please use 'name' or 'username'.",
            )),
        }
    }
}

impl fmt::Display for BorrowerSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BorrowerSearch::Name => "name",
            BorrowerSearch::Username => "username",
        })
    }
}

/// Keeps borrower records, the name index and held books in step.
#[derive(Debug, Clone)]
pub struct BorrowerEngine {
    store: StoreAdapter,
}

impl BorrowerEngine {
    /// Create an engine over a store adapter.
    pub fn new(store: StoreAdapter) -> Self {
        Self { store }
    }

    /// Add a new borrower. Fails with `DuplicateKey` if the username is taken.
    ///
    /// The name is only indexed once the record is stored.
    pub async fn add(&self, borrower: &Borrower) -> StacksResult<()> {
        let username = &borrower.username;
        if !self
            .store
            .store_object(&borrower_key(username), &borrower.fields(), false)
            .await
        {
            return Err(StacksError::duplicate_key(EntityRef::borrower(username)));
        }

        let mut progress = Progress::default();
        progress.step(
            BORROWER_NAME_INDEX
                .add_reference(&self.store, &borrower.name, username)
                .await,
            format!("name index ({})", borrower.name),
        );

        if progress.is_clean() {
            info!(target: "stacks::borrowers", username = %username, "Borrower added");
        }
        self.report(progress, "Adding", username)
    }

    /// Remove a borrower and return every book they hold.
    ///
    /// Each held book is returned by deleting its `borrowing` entry and then
    /// its mirror entry. The mirror key is deleted only when every return
    /// succeeded, so a partial failure leaves exactly the unreturned books
    /// behind and the command can be retried. A retry after the record is
    /// gone still works as long as the mirror remains.
    pub async fn remove(&self, username: &str) -> StacksResult<()> {
        let record_key = borrower_key(username);
        let mirror_key = borrowed_by_key(username);
        let name = self.store.get_field(&record_key, FIELD_NAME).await;
        let held = self.store.field_names(&mirror_key).await;
        if name.is_none() && held.is_empty() {
            return Err(StacksError::not_found(EntityRef::borrower(username)));
        }

        let mut progress = Progress::default();
        if let Some(name) = &name {
            progress.step(
                BORROWER_NAME_INDEX
                    .remove_reference(&self.store, name, username)
                    .await,
                format!("name index ({})", name),
            );
        }
        progress.step(
            self.store.remove_object(&record_key).await,
            "borrower record",
        );

        let mut all_returned = true;
        for isbn in &held {
            let returned = self.return_book(isbn, username).await
                && self.store.remove_field(&mirror_key, isbn).await;
            if !returned {
                all_returned = false;
                progress.step(false, format!("checkout of book with ISBN {}", isbn));
            }
        }
        if all_returned {
            progress.step(
                self.store.remove_object(&mirror_key).await,
                "borrowed books",
            );
        }

        if progress.is_clean() {
            info!(target: "stacks::borrowers", username, returned = held.len(), "Borrower removed");
        }
        self.report(progress, "Removing", username)
    }

    /// Replace a borrower's name and phone. The username never changes.
    ///
    /// The old name reference is dropped before the new one is added.
    pub async fn edit(&self, borrower: &Borrower) -> StacksResult<()> {
        let username = &borrower.username;
        let record_key = borrower_key(username);
        if !self.store.object_exists(&record_key).await {
            return Err(StacksError::not_found(EntityRef::borrower(username)));
        }
        let old_name = self.store.get_field(&record_key, FIELD_NAME).await;

        let mut progress = Progress::default();
        if old_name.as_deref() != Some(borrower.name.as_str()) {
            if let Some(old) = &old_name {
                progress.step(
                    BORROWER_NAME_INDEX
                        .remove_reference(&self.store, old, username)
                        .await,
                    format!("name index ({})", old),
                );
            }
            progress.step(
                BORROWER_NAME_INDEX
                    .add_reference(&self.store, &borrower.name, username)
                    .await,
                format!("name index ({})", borrower.name),
            );
        }
        progress.step(
            self.store
                .store_object(&record_key, &borrower.fields(), true)
                .await,
            "borrower record",
        );

        if progress.is_clean() {
            info!(target: "stacks::borrowers", username = %username, "Borrower edited");
        }
        self.report(progress, "Editing", username)
    }

    /// Names of the books a borrower holds, in isbn order.
    pub async fn borrowed_by(&self, username: &str) -> Vec<String> {
        self.store.field_values(&borrowed_by_key(username)).await
    }

    /// Borrowers whose `by` attribute equals `query`.
    pub async fn search(&self, by: BorrowerSearch, query: &str) -> Vec<Borrower> {
        let usernames = match by {
            BorrowerSearch::Name => BORROWER_NAME_INDEX.members(&self.store, query).await,
            BorrowerSearch::Username => vec![query.to_string()],
        };
        self.fetch_all(&usernames).await
    }

    /// Every borrower, grouped by name in lexical order.
    pub async fn list(&self) -> Vec<Group<Borrower>> {
        let mut groups = Vec::new();
        for name in BORROWER_NAME_INDEX.values(&self.store).await {
            let usernames = BORROWER_NAME_INDEX.members(&self.store, &name).await;
            let borrowers = self.fetch_all(&usernames).await;
            if !borrowers.is_empty() {
                groups.push(Group::new(name, borrowers));
            }
        }
        groups
    }

    /// Read a borrower record back.
    pub async fn fetch(&self, username: &str) -> Option<Borrower> {
        let key = borrower_key(username);
        let name = self.store.get_field(&key, FIELD_NAME).await?;
        let stored_username = self.store.get_field(&key, FIELD_USERNAME).await;
        let phone = self.store.get_field(&key, FIELD_PHONE).await;
        Some(Borrower {
            name,
            username: stored_username.unwrap_or_else(|| username.to_string()),
            phone: phone.unwrap_or_default(),
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Clear the `borrowing` entry for a book held by `username`.
    ///
    /// An entry naming someone else is left alone; the mirror was stale.
    /// An unreadable entry counts as not returned, so the mirror keeps it.
    async fn return_book(&self, isbn: &str, username: &str) -> bool {
        match self.store.lookup_field(BORROWING, isbn).await {
            Ok(Some(holder)) if holder == username => {
                debug!(target: "stacks::borrowers", isbn, username, "Returning book");
                self.store.remove_field(BORROWING, isbn).await
            }
            Ok(Some(holder)) => {
                warn!(target: "stacks::borrowers", isbn, username, holder = %holder, "Stale borrowed-by entry");
                true
            }
            Ok(None) => true,
            Err(_) => false,
        }
    }

    async fn fetch_all(&self, usernames: &[String]) -> Vec<Borrower> {
        let mut borrowers = Vec::with_capacity(usernames.len());
        for username in usernames {
            match self.fetch(username).await {
                Some(borrower) => borrowers.push(borrower),
                None => debug!(target: "stacks::borrowers", username = %username, "Index names a missing borrower"),
            }
        }
        borrowers
    }

    fn report(&self, progress: Progress, action: &str, username: &str) -> StacksResult<()> {
        progress
            .finish(format_args!("{} borrower {}", action, username))
            .map_err(|e| {
                warn!(target: "stacks::borrowers", username, error = %e, "Borrower update incomplete");
                e
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::BookEngine;
    use stacks_core::Book;
    use stacks_storage::{FaultRule, FaultyStore, MemoryStore, StoreOp};
    use std::sync::Arc;

    struct Fixture {
        store: Arc<FaultyStore<MemoryStore>>,
        adapter: StoreAdapter,
        books: BookEngine,
        borrowers: BorrowerEngine,
    }

    fn setup() -> Fixture {
        let store = Arc::new(FaultyStore::new(MemoryStore::new()));
        let adapter = StoreAdapter::new(store.clone());
        Fixture {
            store,
            books: BookEngine::new(adapter.clone()),
            borrowers: BorrowerEngine::new(adapter.clone()),
            adapter,
        }
    }

    fn borrower(name: &str, username: &str, phone: &str) -> Borrower {
        Borrower {
            name: name.to_string(),
            username: username.to_string(),
            phone: phone.to_string(),
        }
    }

    async fn add_books(f: &Fixture, isbns: &[&str]) {
        for isbn in isbns {
            let book = Book {
                name: format!("Book {}", isbn),
                authors: vec!["Anon".to_string()],
                isbn: isbn.to_string(),
                pages: "100".to_string(),
            };
            f.books.add(&book).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_add_and_search() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "555-0100")).await.unwrap();
        f.borrowers.add(&borrower("Sam", "sam2", "555-0101")).await.unwrap();

        let found = f.borrowers.search(BorrowerSearch::Name, "Sam").await;
        let usernames: Vec<_> = found.iter().map(|b| b.username.as_str()).collect();
        assert_eq!(usernames, vec!["sam1", "sam2"]);

        let found = f.borrowers.search(BorrowerSearch::Username, "sam2").await;
        assert_eq!(found[0].to_string(), "Sam, sam2, 555-0101");
        assert!(f.borrowers.search(BorrowerSearch::Username, "nobody").await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_not_indexed() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "555-0100")).await.unwrap();
        let err = f
            .borrowers
            .add(&borrower("Alex", "sam1", "555-0199"))
            .await
            .unwrap_err();
        assert_eq!(err, StacksError::duplicate_key(EntityRef::borrower("sam1")));
        assert!(f.borrowers.search(BorrowerSearch::Name, "Alex").await.is_empty());
        assert_eq!(f.adapter.sorted_index_values("usernames").await, vec!["Sam"]);
    }

    #[tokio::test]
    async fn test_edit_moves_name_reference() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "555-0100")).await.unwrap();
        f.borrowers
            .edit(&borrower("Samantha", "sam1", "555-0199"))
            .await
            .unwrap();

        assert!(f.borrowers.search(BorrowerSearch::Name, "Sam").await.is_empty());
        assert_eq!(
            f.adapter.sorted_index_values("usernames").await,
            vec!["Samantha"]
        );
        assert_eq!(
            f.borrowers.fetch("sam1").await.unwrap().to_string(),
            "Samantha, sam1, 555-0199"
        );
    }

    #[tokio::test]
    async fn test_edit_same_name_keeps_reference() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "555-0100")).await.unwrap();
        f.borrowers
            .edit(&borrower("Sam", "sam1", "555-0199"))
            .await
            .unwrap();
        assert_eq!(f.borrowers.search(BorrowerSearch::Name, "Sam").await.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_missing_borrower() {
        let f = setup();
        let err = f
            .borrowers
            .edit(&borrower("Sam", "ghost", "0"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_remove_returns_every_book() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "555-0100")).await.unwrap();
        add_books(&f, &["111", "222", "333"]).await;
        for isbn in ["111", "222", "333"] {
            f.books.checkout(isbn, "sam1").await.unwrap();
        }
        assert_eq!(f.borrowers.borrowed_by("sam1").await.len(), 3);

        f.borrowers.remove("sam1").await.unwrap();
        for isbn in ["111", "222", "333"] {
            assert_eq!(f.books.borrower_of(isbn).await, None);
        }
        assert!(!f.store.inner().contains("borrowed-by-sam1"));
        assert!(!f.store.inner().contains("borrower-sam1"));
        assert!(f.adapter.sorted_index_values("usernames").await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_partial_failure_keeps_unreturned() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "555-0100")).await.unwrap();
        add_books(&f, &["111", "222"]).await;
        f.books.checkout("111", "sam1").await.unwrap();
        f.books.checkout("222", "sam1").await.unwrap();
        f.store
            .inject(FaultRule::new(StoreOp::HDel, "borrowing").member("222").times(1));

        let err = f.borrowers.remove("sam1").await.unwrap_err();
        assert!(err.to_string().contains("ISBN 222"));
        assert_eq!(f.books.borrower_of("111").await, None);
        assert_eq!(f.books.borrower_of("222").await, Some("sam1".to_string()));
        assert_eq!(f.adapter.field_names("borrowed-by-sam1").await, vec!["222"]);

        // Retry finishes the job even though the record is already gone
        f.borrowers.remove("sam1").await.unwrap();
        assert_eq!(f.books.borrower_of("222").await, None);
        assert!(!f.store.inner().contains("borrowed-by-sam1"));
    }

    #[tokio::test]
    async fn test_remove_unreadable_checkout_stays_retryable() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "555-0100")).await.unwrap();
        add_books(&f, &["111"]).await;
        f.books.checkout("111", "sam1").await.unwrap();
        f.store
            .inject(FaultRule::new(StoreOp::HGet, "borrowing").member("111").times(1));

        let err = f.borrowers.remove("sam1").await.unwrap_err();
        assert!(err.to_string().contains("ISBN 111"));
        assert_eq!(f.books.borrower_of("111").await, Some("sam1".to_string()));
        assert_eq!(f.adapter.field_names("borrowed-by-sam1").await, vec!["111"]);

        f.borrowers.remove("sam1").await.unwrap();
        assert_eq!(f.books.borrower_of("111").await, None);
        assert!(!f.store.inner().contains("borrowed-by-sam1"));
    }

    #[tokio::test]
    async fn test_remove_missing_borrower() {
        let f = setup();
        assert!(f.borrowers.remove("ghost").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_remove_leaves_other_holders_alone() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "1")).await.unwrap();
        f.borrowers.add(&borrower("Alex", "alex", "2")).await.unwrap();
        add_books(&f, &["111"]).await;
        f.books.checkout("111", "alex").await.unwrap();
        // A stale mirror claiming sam1 holds the same book
        f.adapter
            .set_field("borrowed-by-sam1", "111", "Book 111", true)
            .await;

        f.borrowers.remove("sam1").await.unwrap();
        assert_eq!(f.books.borrower_of("111").await, Some("alex".to_string()));
    }

    #[tokio::test]
    async fn test_list_groups_by_name() {
        let f = setup();
        f.borrowers.add(&borrower("Sam", "sam1", "1")).await.unwrap();
        f.borrowers.add(&borrower("Alex", "alex", "2")).await.unwrap();
        f.borrowers.add(&borrower("Sam", "sam2", "3")).await.unwrap();

        let groups = f.borrowers.list().await;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].heading, "Alex");
        assert_eq!(groups[1].entries.len(), 2);
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(
            "username".parse::<BorrowerSearch>().unwrap(),
            BorrowerSearch::Username
        );
        assert_eq!(
            "phone".parse::<BorrowerSearch>().unwrap_err().to_string(),
            "Invalid search type entered. Please use 'name' or 'username'."
        );
    }
}
