//! Index maintenance engine for the Stacks catalog.
//!
//! The store offers no joins, transactions or foreign keys, so every
//! logical change is an ordered sequence of single-key primitive calls that
//! keeps primary records and their hand-built indexes in step:
//!
//! - [`books`]: `BookEngine` (add, remove, edit, search, list, checkout)
//! - [`borrowers`]: `BorrowerEngine` (add, remove with returns, edit, search)
//! - [`index`]: reference-counted secondary indexes
//! - [`audit`]: read-only integrity check of every index
//! - [`catalog`]: both halves over one injected store handle
//! - [`config`]: `StacksConfig` file loading
//!
//! # Concurrency
//!
//! One command runs to completion before the next starts. The
//! no-overwrite guards are check-then-act over two round trips, so two
//! processes sharing a store can still race.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod books;
pub mod borrowers;
pub mod catalog;
pub mod config;
pub mod index;
mod progress;

pub use audit::IndexViolation;
pub use books::{BookEngine, BookSearch, BookSort};
pub use borrowers::{BorrowerEngine, BorrowerSearch};
pub use catalog::Catalog;
pub use config::{ConfigError, StacksConfig};

/// Entries sharing one index value, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T> {
    /// The index value (name, author, page count, or isbn)
    pub heading: String,
    /// Entries carrying the value
    pub entries: Vec<T>,
}

impl<T> Group<T> {
    /// Create a group.
    pub fn new(heading: impl Into<String>, entries: Vec<T>) -> Self {
        Self {
            heading: heading.into(),
            entries,
        }
    }
}
