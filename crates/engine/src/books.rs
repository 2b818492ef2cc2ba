//! Book half of the index maintenance engine.
//!
//! A book is spread over these keys:
//! - `book-{isbn}`: the record (name, isbn, pages)
//! - `authors-{isbn}`: the ordered author list
//! - one reference each in the name, page count and author indexes
//! - its isbn in the `isbns` sorted index
//! - while checked out, a `borrowing` entry and a `borrowed-by-{user}` mirror
//!
//! Every mutation below is an ordered sequence of single-key calls. Nothing
//! is rolled back when a step fails; the failed steps are reported instead.
//! Checkout is the one exception, see [`BookEngine::checkout`].

use std::fmt;
use std::str::FromStr;

use stacks_core::keys::{
    authors_key, book_key, borrowed_by_key, borrower_key, BORROWING, FIELD_ISBN, FIELD_NAME,
    FIELD_PAGES, ISBNS,
};
use stacks_core::{Book, EntityRef, StacksError, StacksResult};
use stacks_storage::StoreAdapter;
use tracing::{debug, info, warn};

use crate::index::{AUTHOR_INDEX, NAME_INDEX, PAGE_INDEX};
use crate::progress::Progress;
use crate::Group;

// =============================================================================
// Query types
// =============================================================================

/// Attribute a book search matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSearch {
    /// Exact book name
    Name,
    /// Exact author
    Author,
    /// Exact isbn
    Isbn,
}

impl FromStr for BookSearch {
    type Err = StacksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(BookSearch::Name),
            "author" => Ok(BookSearch::Author),
            "isbn" => Ok(BookSearch::Isbn),
            _ => Err(StacksError::invalid_argument(
                "Invalid search type, please use 'name', 'author', or 'isbn'.",
            )),
        }
    }
}

impl fmt::Display for BookSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookSearch::Name => "name",
            BookSearch::Author => "author",
            BookSearch::Isbn => "isbn",
        })
    }
}

/// Order of a book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSort {
    /// Grouped by name
    Name,
    /// Grouped by author; a book with several authors appears once per author
    Author,
    /// Grouped by page count, in lexical order of the count
    PageCount,
    /// One row per isbn
    Isbn,
}

impl FromStr for BookSort {
    type Err = StacksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(BookSort::Name),
            "author" => Ok(BookSort::Author),
            "page count" => Ok(BookSort::PageCount),
            "isbn" => Ok(BookSort::Isbn),
            _ => Err(StacksError::invalid_argument(
                "Invalid sort type, please use 'name', 'author', 'page count', or 'isbn'.",
            )),
        }
    }
}

impl fmt::Display for BookSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookSort::Name => "name",
            BookSort::Author => "author",
            BookSort::PageCount => "page count",
            BookSort::Isbn => "isbn",
        })
    }
}

// =============================================================================
// BookEngine
// =============================================================================

/// Keeps book records, their indexes and the borrowing relation in step.
#[derive(Debug, Clone)]
pub struct BookEngine {
    store: StoreAdapter,
}

impl BookEngine {
    /// Create an engine over a store adapter.
    pub fn new(store: StoreAdapter) -> Self {
        Self { store }
    }

    /// Add a new book.
    ///
    /// Fails with `DuplicateKey` if a record for the isbn already exists (or
    /// its existence cannot be checked). Index writes after the record are
    /// best effort.
    pub async fn add(&self, book: &Book) -> StacksResult<()> {
        if !self
            .store
            .store_object(&book_key(&book.isbn), &book.fields(), false)
            .await
        {
            return Err(StacksError::duplicate_key(EntityRef::book(&book.isbn)));
        }

        let mut progress = Progress::default();
        self.write_authors(book, &mut progress).await;
        self.add_references(book, &mut progress).await;
        progress.step(
            self.store.add_to_sorted_index(ISBNS, &book.isbn).await,
            "isbn index",
        );

        if progress.is_clean() {
            info!(target: "stacks::books", isbn = %book.isbn, name = %book.name, "Book added");
        }
        self.report(progress, "Adding", &book.isbn)
    }

    /// Remove a book, its indexes and any active checkout.
    ///
    /// The record is read before anything is deleted, so the references to
    /// drop come from the stored values.
    pub async fn remove(&self, isbn: &str) -> StacksResult<()> {
        let Some(book) = self.fetch(isbn).await else {
            return Err(StacksError::not_found(EntityRef::book(isbn)));
        };
        let holder = self.current_holder("Removing", isbn).await?;

        let mut progress = Progress::default();
        self.remove_references(&book, &mut progress).await;
        progress.step(
            self.store.remove_object(&book_key(isbn)).await,
            "book record",
        );
        progress.step(
            self.store.remove_object(&authors_key(isbn)).await,
            "author list",
        );
        progress.step(
            self.store.remove_from_sorted_index(ISBNS, isbn).await,
            "isbn index",
        );

        if let Some(username) = holder {
            debug!(target: "stacks::books", isbn, username = %username, "Returning removed book");
            progress.step(
                self.store.remove_field(BORROWING, isbn).await,
                "borrowing entry",
            );
            progress.step(
                self.store.remove_field(&borrowed_by_key(&username), isbn).await,
                format!("books borrowed by {}", username),
            );
        }

        if progress.is_clean() {
            info!(target: "stacks::books", isbn, "Book removed");
        }
        self.report(progress, "Removing", isbn)
    }

    /// Replace a book's name, authors and page count. The isbn never changes.
    ///
    /// Old references are dropped using the stored (old) values before the
    /// new ones are added. An active checkout is kept and its cached book
    /// name rewritten.
    pub async fn edit(&self, book: &Book) -> StacksResult<()> {
        let Some(old) = self.fetch(&book.isbn).await else {
            return Err(StacksError::not_found(EntityRef::book(&book.isbn)));
        };
        let holder = self.current_holder("Editing", &book.isbn).await?;

        let mut progress = Progress::default();
        self.remove_references(&old, &mut progress).await;
        progress.step(
            self.store
                .store_object(&book_key(&book.isbn), &book.fields(), true)
                .await,
            "book record",
        );
        progress.step(
            self.store.remove_object(&authors_key(&book.isbn)).await,
            "author list",
        );
        self.write_authors(book, &mut progress).await;
        self.add_references(book, &mut progress).await;

        if let Some(username) = holder {
            progress.step(
                self.store
                    .set_field(&borrowed_by_key(&username), &book.isbn, &book.name, true)
                    .await,
                format!("books borrowed by {}", username),
            );
        }

        if progress.is_clean() {
            info!(target: "stacks::books", isbn = %book.isbn, name = %book.name, "Book edited");
        }
        self.report(progress, "Editing", &book.isbn)
    }

    /// Books whose `by` attribute equals `query`. Empty when nothing matches.
    pub async fn search(&self, by: BookSearch, query: &str) -> Vec<Book> {
        let isbns = match by {
            BookSearch::Name => NAME_INDEX.members(&self.store, query).await,
            BookSearch::Author => AUTHOR_INDEX.members(&self.store, query).await,
            BookSearch::Isbn => vec![query.to_string()],
        };
        self.fetch_all(&isbns).await
    }

    /// Every book, grouped and ordered by `by`.
    ///
    /// Groups follow the lexical order of the index; books inside a group
    /// follow the member set's order. Groups whose books are all missing are
    /// left out.
    pub async fn list(&self, by: BookSort) -> Vec<Group<Book>> {
        let index = match by {
            BookSort::Name => NAME_INDEX,
            BookSort::Author => AUTHOR_INDEX,
            BookSort::PageCount => PAGE_INDEX,
            BookSort::Isbn => {
                let mut groups = Vec::new();
                for isbn in self.store.sorted_index_values(ISBNS).await {
                    if let Some(book) = self.fetch(&isbn).await {
                        groups.push(Group::new(isbn, vec![book]));
                    }
                }
                return groups;
            }
        };

        let mut groups = Vec::new();
        for value in index.values(&self.store).await {
            let isbns = index.members(&self.store, &value).await;
            let books = self.fetch_all(&isbns).await;
            if !books.is_empty() {
                groups.push(Group::new(value, books));
            }
        }
        groups
    }

    /// Check a book out to a borrower.
    ///
    /// Both records must exist. The `borrowing` entry is written first with
    /// the no-overwrite guard, which is what makes checkouts exclusive. If
    /// the borrower's mirror cannot be written afterwards the `borrowing`
    /// entry is deleted again, so a failed checkout leaves nothing behind.
    pub async fn checkout(&self, isbn: &str, username: &str) -> StacksResult<()> {
        let Some(name) = self.store.get_field(&book_key(isbn), FIELD_NAME).await else {
            return Err(StacksError::not_found(EntityRef::book(isbn)));
        };
        if !self.store.object_exists(&borrower_key(username)).await {
            return Err(StacksError::not_found(EntityRef::borrower(username)));
        }

        if !self.store.set_field(BORROWING, isbn, username, false).await {
            return Err(StacksError::already_checked_out(isbn));
        }

        if !self
            .store
            .set_field(&borrowed_by_key(username), isbn, &name, true)
            .await
        {
            let undone = self.store.remove_field(BORROWING, isbn).await;
            warn!(target: "stacks::books", isbn, username, undone, "Checkout mirror write failed");
            let reason = if undone {
                format!(
                    "could not record book with ISBN {} for {}; the checkout was undone",
                    isbn, username
                )
            } else {
                format!(
                    "could not record book with ISBN {} for {}, and the checkout could not be undone",
                    isbn, username
                )
            };
            return Err(StacksError::store_unavailable(reason));
        }

        info!(target: "stacks::books", isbn, username, "Book checked out");
        Ok(())
    }

    /// Username of the book's current borrower, if it is checked out.
    pub async fn borrower_of(&self, isbn: &str) -> Option<String> {
        self.store.get_field(BORROWING, isbn).await
    }

    /// Read a whole book back from its record and author list.
    pub async fn fetch(&self, isbn: &str) -> Option<Book> {
        let key = book_key(isbn);
        let name = self.store.get_field(&key, FIELD_NAME).await?;
        let stored_isbn = self.store.get_field(&key, FIELD_ISBN).await;
        let pages = self.store.get_field(&key, FIELD_PAGES).await;
        let authors = self.store.read_sequence(&authors_key(isbn)).await;
        Some(Book {
            name,
            authors,
            isbn: stored_isbn.unwrap_or_else(|| isbn.to_string()),
            pages: pages.unwrap_or_default(),
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Username holding `isbn`, read before a change writes anything. A
    /// failed read stops the change so the checkout is never orphaned.
    async fn current_holder(&self, action: &str, isbn: &str) -> StacksResult<Option<String>> {
        self.store.lookup_field(BORROWING, isbn).await.map_err(|e| {
            warn!(target: "stacks::books", isbn, error = %e, "Checkout unreadable, change not started");
            StacksError::store_unavailable(format!(
                "{} book with ISBN {} did not start; could not read its checkout",
                action, isbn
            ))
        })
    }

    async fn fetch_all(&self, isbns: &[String]) -> Vec<Book> {
        let mut books = Vec::with_capacity(isbns.len());
        for isbn in isbns {
            match self.fetch(isbn).await {
                Some(book) => books.push(book),
                None => debug!(target: "stacks::books", isbn = %isbn, "Index names a missing book"),
            }
        }
        books
    }

    async fn write_authors(&self, book: &Book, progress: &mut Progress) {
        let key = authors_key(&book.isbn);
        for author in &book.authors {
            progress.step(
                self.store.append_to_sequence(&key, author).await,
                format!("author list ({})", author),
            );
        }
    }

    async fn add_references(&self, book: &Book, progress: &mut Progress) {
        let isbn = &book.isbn;
        progress.step(
            NAME_INDEX.add_reference(&self.store, &book.name, isbn).await,
            format!("name index ({})", book.name),
        );
        progress.step(
            PAGE_INDEX.add_reference(&self.store, &book.pages, isbn).await,
            format!("page count index ({})", book.pages),
        );
        for author in &book.authors {
            progress.step(
                AUTHOR_INDEX.add_reference(&self.store, author, isbn).await,
                format!("author index ({})", author),
            );
        }
    }

    async fn remove_references(&self, book: &Book, progress: &mut Progress) {
        let isbn = &book.isbn;
        progress.step(
            NAME_INDEX.remove_reference(&self.store, &book.name, isbn).await,
            format!("name index ({})", book.name),
        );
        progress.step(
            PAGE_INDEX.remove_reference(&self.store, &book.pages, isbn).await,
            format!("page count index ({})", book.pages),
        );
        for author in &book.authors {
            progress.step(
                AUTHOR_INDEX.remove_reference(&self.store, author, isbn).await,
                format!("author index ({})", author),
            );
        }
    }

    fn report(&self, progress: Progress, action: &str, isbn: &str) -> StacksResult<()> {
        progress
            .finish(format_args!("{} book with ISBN {}", action, isbn))
            .map_err(|e| {
                warn!(target: "stacks::books", isbn, error = %e, "Book update incomplete");
                e
            })
    }
}
