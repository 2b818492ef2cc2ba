//! Record models for books and borrowers.
//!
//! Commands arrive as positional argument lists. The models turn those lists
//! into typed records once, at the dispatcher boundary, so the engine never
//! reasons about token positions.
//!
//! Positional conventions:
//! - add book: `[name, author.., isbn, pages]` (isbn and pages are always last)
//! - edit book: `[isbn, name, author.., pages]` (isbn is always first)
//! - add borrower: `[name, username, phone]`
//! - edit borrower: `[username, name, phone]`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StacksError, StacksResult};
use crate::keys::{FIELD_ISBN, FIELD_NAME, FIELD_PAGES, FIELD_PHONE, FIELD_USERNAME};

/// Fixed fields of an add-book argument list besides the authors.
const BOOK_FIXED_ARGS: usize = 3;

/// A book record together with its ordered authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Title
    pub name: String,
    /// Authors in the order they were given; may be empty
    pub authors: Vec<String>,
    /// Primary identity, immutable once stored
    pub isbn: String,
    /// String-encoded page count
    pub pages: String,
}

impl Book {
    /// Build a book from add-book arguments `[name, author.., isbn, pages]`.
    pub fn from_args(args: &[String]) -> StacksResult<Self> {
        if args.len() < BOOK_FIXED_ARGS {
            return Err(StacksError::invalid_argument(
                "A book needs a name, optional authors, an isbn and a page count.",
            ));
        }
        let last = args.len() - 1;
        Ok(Book {
            name: args[0].clone(),
            authors: args[1..last - 1].to_vec(),
            isbn: args[last - 1].clone(),
            pages: args[last].clone(),
        })
    }

    /// Build a book from edit-book arguments `[isbn, name, author.., pages]`.
    ///
    /// The isbn is moved behind the authors so the list has the add-book
    /// shape, then parsed with [`Book::from_args`].
    pub fn from_edit_args(args: &[String]) -> StacksResult<Self> {
        let Some((isbn, rest)) = args.split_first() else {
            return Err(StacksError::invalid_argument(
                "Editing a book needs an isbn, a name, optional authors and a page count.",
            ));
        };
        let Some((pages, head)) = rest.split_last() else {
            return Err(StacksError::invalid_argument(
                "Editing a book needs an isbn, a name, optional authors and a page count.",
            ));
        };
        let mut canonical = head.to_vec();
        canonical.push(isbn.clone());
        canonical.push(pages.clone());
        Self::from_args(&canonical)
    }

    /// Field/value pairs of the primary record. Authors are stored separately.
    pub fn fields(&self) -> Vec<(String, String)> {
        vec![
            (FIELD_NAME.to_string(), self.name.clone()),
            (FIELD_ISBN.to_string(), self.isbn.clone()),
            (FIELD_PAGES.to_string(), self.pages.clone()),
        ]
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authors = if self.authors.is_empty() {
            "No authors".to_string()
        } else {
            self.authors.join(", ")
        };
        write!(f, "{}, {}, {}, {}", self.name, self.isbn, authors, self.pages)
    }
}

/// A borrower record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    /// Display name; several borrowers may share it
    pub name: String,
    /// Primary identity
    pub username: String,
    /// Contact number
    pub phone: String,
}

impl Borrower {
    /// Build a borrower from add-borrower arguments `[name, username, phone]`.
    pub fn from_args(args: &[String]) -> StacksResult<Self> {
        match args {
            [name, username, phone] => Ok(Borrower {
                name: name.clone(),
                username: username.clone(),
                phone: phone.clone(),
            }),
            _ => Err(StacksError::invalid_argument(
                "A borrower needs a name, a username and a phone number.",
            )),
        }
    }

    /// Build a borrower from edit-borrower arguments `[username, name, phone]`.
    pub fn from_edit_args(args: &[String]) -> StacksResult<Self> {
        match args {
            [username, name, phone] => Ok(Borrower {
                name: name.clone(),
                username: username.clone(),
                phone: phone.clone(),
            }),
            _ => Err(StacksError::invalid_argument(
                "Editing a borrower needs a username, a new name and a new phone number.",
            )),
        }
    }

    /// Field/value pairs of the primary record.
    pub fn fields(&self) -> Vec<(String, String)> {
        vec![
            (FIELD_NAME.to_string(), self.name.clone()),
            (FIELD_USERNAME.to_string(), self.username.clone()),
            (FIELD_PHONE.to_string(), self.phone.clone()),
        ]
    }
}

impl fmt::Display for Borrower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.name, self.username, self.phone)
    }
}
