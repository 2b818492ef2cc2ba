//! Error conversion from catalog errors.
//!
//! Maps [`StacksError`] onto the executor's [`Error`], using the typed
//! [`EntityRef`] to pick the book or borrower variant.

use crate::Error;
use stacks_core::{EntityRef, StacksError};

impl From<StacksError> for Error {
    fn from(err: StacksError) -> Self {
        match err {
            StacksError::InvalidArgument { reason } => Error::InvalidArgument { reason },

            StacksError::DuplicateKey { entity } => match entity {
                EntityRef::Book { isbn } => Error::DuplicateBook { isbn },
                EntityRef::Borrower { username } => Error::DuplicateBorrower { username },
            },

            StacksError::NotFound { entity } => match entity {
                EntityRef::Book { isbn } => Error::BookNotFound { isbn },
                EntityRef::Borrower { username } => Error::BorrowerNotFound { username },
            },

            StacksError::AlreadyCheckedOut { isbn } => Error::AlreadyCheckedOut { isbn },

            StacksError::StoreUnavailable { reason } => Error::StoreUnavailable { reason },
        }
    }
}
