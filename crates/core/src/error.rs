//! Catalog error taxonomy.
//!
//! Every engine operation reports failure through [`StacksError`]. The
//! variants follow the failure classes an operator can act on:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `InvalidArgument` | Wrong arity or unknown sub-command / search type |
//! | `DuplicateKey` | Creation over an existing primary key |
//! | `NotFound` | The targeted primary key does not exist |
//! | `AlreadyCheckedOut` | The book already has an active borrower |
//! | `StoreUnavailable` | Transport failure talking to the store |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type for catalog operations.
pub type StacksResult<T> = std::result::Result<T, StacksError>;

/// Reference to a primary record, used to name the subject of an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    /// A book, addressed by isbn.
    Book {
        /// The book's isbn
        isbn: String,
    },
    /// A borrower, addressed by username.
    Borrower {
        /// The borrower's username
        username: String,
    },
}

impl EntityRef {
    /// Reference a book by isbn.
    pub fn book(isbn: impl Into<String>) -> Self {
        EntityRef::Book { isbn: isbn.into() }
    }

    /// Reference a borrower by username.
    pub fn borrower(username: impl Into<String>) -> Self {
        EntityRef::Borrower {
            username: username.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Book { isbn } => write!(f, "Book with ISBN {}", isbn),
            EntityRef::Borrower { username } => write!(f, "Borrower with username {}", username),
        }
    }
}

/// Errors produced by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StacksError {
    /// Malformed command: wrong arity or an unrecognized sub-command.
    #[error("{reason}")]
    InvalidArgument {
        /// Operator-facing explanation
        reason: String,
    },

    /// Attempted creation over an existing primary key.
    #[error("{entity} already exists.")]
    DuplicateKey {
        /// The record that already exists
        entity: EntityRef,
    },

    /// The operation targets a primary key that does not exist.
    #[error("{entity} does not exist.")]
    NotFound {
        /// The missing record
        entity: EntityRef,
    },

    /// The book already has an active borrower.
    #[error("Book with ISBN {isbn} is already checked out.")]
    AlreadyCheckedOut {
        /// The book's isbn
        isbn: String,
    },

    /// The store could not be reached, or a multi-step operation stopped
    /// part way because a primitive call failed.
    #[error("Store unavailable: {reason}")]
    StoreUnavailable {
        /// What failed
        reason: String,
    },
}

impl StacksError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        StacksError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a DuplicateKey error.
    pub fn duplicate_key(entity: EntityRef) -> Self {
        StacksError::DuplicateKey { entity }
    }

    /// Create a NotFound error.
    pub fn not_found(entity: EntityRef) -> Self {
        StacksError::NotFound { entity }
    }

    /// Create an AlreadyCheckedOut error.
    pub fn already_checked_out(isbn: impl Into<String>) -> Self {
        StacksError::AlreadyCheckedOut { isbn: isbn.into() }
    }

    /// Create a StoreUnavailable error.
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        StacksError::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// True if this error is a NotFound.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StacksError::NotFound { .. })
    }
}
