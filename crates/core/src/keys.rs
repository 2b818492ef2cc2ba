//! Key construction for catalog storage.
//!
//! Every logical entity is spread over several physical keys. The names are
//! part of the persisted layout and must not change:
//!
//! | Key | Primitive | Content |
//! |-----|-----------|---------|
//! | `book-{isbn}` | hash | name, isbn, pages |
//! | `authors-{isbn}` | list | authors in order |
//! | `borrower-{username}` | hash | name, username, phone |
//! | `borrowing` | hash | isbn -> username |
//! | `borrowed-by-{username}` | hash | isbn -> book name |
//! | `book-names` / `books-named-{name}` | sorted set / set | name index |
//! | `authors` / `books-by-{author}` | sorted set / set | author index |
//! | `page-counts` / `books-with-{n}-pages` | sorted set / set | page index |
//! | `isbns` | sorted set | isbn order |
//! | `usernames` / `usernames-{name}` | sorted set / set | borrower name index |

// =============================================================================
// Record fields
// =============================================================================

/// Hash field holding a book or borrower name.
pub const FIELD_NAME: &str = "name";
/// Hash field holding a book isbn.
pub const FIELD_ISBN: &str = "isbn";
/// Hash field holding a book page count.
pub const FIELD_PAGES: &str = "pages";
/// Hash field holding a borrower username.
pub const FIELD_USERNAME: &str = "username";
/// Hash field holding a borrower phone number.
pub const FIELD_PHONE: &str = "phone";

// =============================================================================
// Primary records
// =============================================================================

/// Key for a book record: `book-{isbn}`
pub fn book_key(isbn: &str) -> String {
    format!("book-{}", isbn)
}

/// Key for a book's ordered author list: `authors-{isbn}`
pub fn authors_key(isbn: &str) -> String {
    format!("authors-{}", isbn)
}

/// Key for a borrower record: `borrower-{username}`
pub fn borrower_key(username: &str) -> String {
    format!("borrower-{}", username)
}

// =============================================================================
// Borrowing relation
// =============================================================================

/// Shared isbn -> username map of active checkouts.
pub const BORROWING: &str = "borrowing";

/// Key for the isbn -> book name mirror of one borrower: `borrowed-by-{username}`
pub fn borrowed_by_key(username: &str) -> String {
    format!("borrowed-by-{}", username)
}

// =============================================================================
// Secondary indexes
// =============================================================================

/// Sorted index of every distinct book name.
pub const BOOK_NAMES: &str = "book-names";

/// Set of isbns carrying a book name: `books-named-{name}`
pub fn books_named_key(name: &str) -> String {
    format!("books-named-{}", name)
}

/// Sorted index of every distinct author.
pub const AUTHORS: &str = "authors";

/// Set of isbns written by an author: `books-by-{author}`
pub fn books_by_key(author: &str) -> String {
    format!("books-by-{}", author)
}

/// Sorted index of every distinct page count.
pub const PAGE_COUNTS: &str = "page-counts";

/// Set of isbns with a page count: `books-with-{pages}-pages`
pub fn books_with_pages_key(pages: &str) -> String {
    format!("books-with-{}-pages", pages)
}

/// Sorted index of every isbn.
pub const ISBNS: &str = "isbns";

/// Sorted index of every distinct borrower name.
pub const BORROWER_NAMES: &str = "usernames";

/// Set of usernames sharing a borrower name: `usernames-{name}`
pub fn usernames_key(name: &str) -> String {
    format!("usernames-{}", name)
}
