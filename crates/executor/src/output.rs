//! Command outputs.
//!
//! Each successful command yields one [`Output`] variant carrying typed
//! data. `Display` renders the operator-facing text the shell prints.

use std::fmt;

use stacks_core::{Book, Borrower};
use stacks_engine::{BookSearch, BookSort, BorrowerSearch, Group, IndexViolation};

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A book was added
    BookAdded {
        /// The new book's isbn
        isbn: String,
    },
    /// A book was removed
    BookRemoved {
        /// The removed isbn
        isbn: String,
    },
    /// A book was edited
    BookEdited {
        /// The edited isbn
        isbn: String,
    },
    /// Books matching a search; empty when nothing matched
    Books {
        /// Attribute searched
        by: BookSearch,
        /// Value searched for
        query: String,
        /// Matches
        books: Vec<Book>,
    },
    /// Every book, grouped
    BookListing {
        /// Grouping used
        by: BookSort,
        /// Groups in index order
        groups: Vec<Group<Book>>,
    },
    /// A book was checked out
    CheckedOut {
        /// The book
        isbn: String,
        /// The borrower
        username: String,
    },
    /// A book's current borrower
    BorrowerOf {
        /// The book
        isbn: String,
        /// Its borrower, if checked out
        username: Option<String>,
    },
    /// A borrower was added
    BorrowerAdded {
        /// The new username
        username: String,
    },
    /// A borrower was removed
    BorrowerRemoved {
        /// The removed username
        username: String,
    },
    /// A borrower was edited
    BorrowerEdited {
        /// The edited username
        username: String,
    },
    /// Names of the books a borrower holds
    BorrowedBy {
        /// The borrower
        username: String,
        /// Book names in isbn order
        books: Vec<String>,
    },
    /// Borrowers matching a search; empty when nothing matched
    Borrowers {
        /// Attribute searched
        by: BorrowerSearch,
        /// Value searched for
        query: String,
        /// Matches
        borrowers: Vec<Borrower>,
    },
    /// Every borrower, grouped by name
    BorrowerListing {
        /// Groups in name order
        groups: Vec<Group<Borrower>>,
    },
    /// Result of the index audit
    IndexReport {
        /// Every inconsistency found
        violations: Vec<IndexViolation>,
    },
}

fn write_rows<T: fmt::Display>(f: &mut fmt::Formatter<'_>, rows: &[T]) -> fmt::Result {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{}", row)?;
    }
    Ok(())
}

/// Groups with a heading line each, separated by blank lines.
fn write_groups<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    label: Option<&str>,
    groups: &[Group<T>],
) -> fmt::Result {
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        if let Some(label) = label {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}: {}", label, group.heading)?;
        }
        write_rows(f, &group.entries)?;
    }
    Ok(())
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::BookAdded { .. } => f.write_str("Book added successfully!"),
            Output::BookRemoved { .. } => f.write_str("Book removed successfully!"),
            Output::BookEdited { .. } => f.write_str("Book edited successfully!"),

            Output::Books { by, query, books } if books.is_empty() => match by {
                BookSearch::Name => write!(f, "No books with name {} were found.", query),
                BookSearch::Author => write!(f, "No books by author {} were found.", query),
                BookSearch::Isbn => write!(f, "Book with isbn {} not found.", query),
            },
            Output::Books { books, .. } => write_rows(f, books),

            Output::BookListing { groups, .. } if groups.is_empty() => {
                f.write_str("No books found.")
            }
            Output::BookListing { by, groups } => {
                let label = match by {
                    BookSort::Author => Some("Author"),
                    BookSort::PageCount => Some("Page count"),
                    BookSort::Name | BookSort::Isbn => None,
                };
                write_groups(f, label, groups)
            }

            Output::CheckedOut { isbn, username } => write!(
                f,
                "Book with ISBN {} has been checked out to {}",
                isbn, username
            ),
            Output::BorrowerOf {
                isbn,
                username: Some(username),
            } => write!(
                f,
                "{} is the borrower of the book with ISBN {}.",
                username, isbn
            ),
            Output::BorrowerOf { isbn, username: None } => write!(
                f,
                "The borrower for the book with ISBN {} cannot be found.",
                isbn
            ),

            Output::BorrowerAdded { .. } => f.write_str("Borrower added successfully!"),
            Output::BorrowerRemoved { .. } => f.write_str("Borrower removed successfully!"),
            Output::BorrowerEdited { .. } => f.write_str("Borrower edited successfully!"),

            Output::BorrowedBy { username, books } if books.is_empty() => write!(
                f,
                "No books found for the borrower with username {}.",
                username
            ),
            Output::BorrowedBy { username, books } => write!(
                f,
                "Books checked out by {}: {}",
                username,
                books.join(", ")
            ),

            Output::Borrowers {
                by,
                query,
                borrowers,
            } if borrowers.is_empty() => match by {
                BorrowerSearch::Name => write!(f, "No usernames found for name {}.", query),
                BorrowerSearch::Username => write!(f, "User with username {} not found.", query),
            },
            Output::Borrowers { borrowers, .. } => write_rows(f, borrowers),

            Output::BorrowerListing { groups } if groups.is_empty() => {
                f.write_str("No borrowers found.")
            }
            Output::BorrowerListing { groups } => write_groups(f, Some("Name"), groups),

            Output::IndexReport { violations } if violations.is_empty() => {
                f.write_str("All indexes are consistent.")
            }
            Output::IndexReport { violations } => {
                write!(f, "Found {} index problem(s):", violations.len())?;
                for violation in violations {
                    write!(f, "\n- {}", violation)?;
                }
                Ok(())
            }
        }
    }
}
