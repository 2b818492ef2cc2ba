//! Executor error type.
//!
//! Every variant's message is the text an operator sees, so the CLI can
//! print errors directly.

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`crate::Executor::execute`] and the typed API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No command has this name.
    #[error("Please provide a valid input.")]
    UnknownCommand {
        /// The name as typed
        command: String,
    },

    /// Wrong argument count or unrecognized search/sort type.
    #[error("{reason}")]
    InvalidArgument {
        /// Operator-facing explanation
        reason: String,
    },

    /// A book with this isbn already exists.
    #[error("Adding book failed! Make sure a book with this isbn doesn't already exist.")]
    DuplicateBook {
        /// The taken isbn
        isbn: String,
    },

    /// A borrower with this username already exists.
    #[error(
        "Adding borrower failed! Make sure a borrower with this username doesn't already exist."
    )]
    DuplicateBorrower {
        /// The taken username
        username: String,
    },

    /// No book with this isbn.
    #[error("Book with ISBN {isbn} does not exist.")]
    BookNotFound {
        /// The missing isbn
        isbn: String,
    },

    /// No borrower with this username.
    #[error("Borrower with username {username} does not exist.")]
    BorrowerNotFound {
        /// The missing username
        username: String,
    },

    /// The book already has a borrower.
    #[error(
        "There was a problem checking out the book. Make sure the book isn't already checked out."
    )]
    AlreadyCheckedOut {
        /// The book's isbn
        isbn: String,
    },

    /// The store failed part way through the command.
    #[error("The store could not complete the request: {reason}")]
    StoreUnavailable {
        /// What failed
        reason: String,
    },

    /// A handler produced an output the caller did not expect.
    #[error("Internal error: {reason}")]
    Internal {
        /// What went wrong
        reason: String,
    },
}
