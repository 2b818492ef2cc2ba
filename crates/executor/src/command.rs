//! Typed commands and the dispatcher's arity contract.
//!
//! A command line arrives as a two-word command name plus a positional
//! argument list. [`Command::parse`] checks the list against the command
//! table and builds a typed command once, so nothing downstream looks at
//! token positions.

use std::fmt;

use stacks_core::{Book, Borrower};
use stacks_engine::{BookSearch, BookSort, BorrowerSearch};

use crate::{Error, Result};

/// How many arguments a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many
    Exactly(usize),
    /// This many or more
    AtLeast(usize),
}

impl Arity {
    /// Whether `count` arguments satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (qualifier, n) = match self {
            Arity::Exactly(0) => return f.write_str("no arguments"),
            Arity::Exactly(n) => ("exactly", n),
            Arity::AtLeast(n) => ("at least", n),
        };
        let noun = if *n == 1 { "argument" } else { "arguments" };
        write!(f, "{} {} {}", qualifier, n, noun)
    }
}

/// One row of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Two-word command name
    pub name: &'static str,
    /// Accepted argument count
    pub arity: Arity,
    /// Argument shape shown in help and errors
    pub usage: &'static str,
    /// One-line description
    pub summary: &'static str,
}

/// Every command the dispatcher accepts.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "add book",
        arity: Arity::AtLeast(3),
        usage: "add book <name>, <author>.., <isbn>, <pages>",
        summary: "Add a book with any number of authors",
    },
    CommandSpec {
        name: "rm book",
        arity: Arity::Exactly(1),
        usage: "rm book <isbn>",
        summary: "Remove a book",
    },
    CommandSpec {
        name: "edit book",
        arity: Arity::AtLeast(3),
        usage: "edit book <isbn>, <new name>, <new author>.., <new pages>",
        summary: "Replace a book's name, authors and page count",
    },
    CommandSpec {
        name: "search books",
        arity: Arity::Exactly(2),
        usage: "search books <name|author|isbn>, <query>",
        summary: "Find books by name, author or isbn",
    },
    CommandSpec {
        name: "list books",
        arity: Arity::Exactly(1),
        usage: "list books <name|author|page count|isbn>",
        summary: "List every book, sorted",
    },
    CommandSpec {
        name: "checkout book",
        arity: Arity::Exactly(2),
        usage: "checkout book <isbn>, <username>",
        summary: "Check a book out to a borrower",
    },
    CommandSpec {
        name: "borrower of",
        arity: Arity::Exactly(1),
        usage: "borrower of <isbn>",
        summary: "Show who holds a book",
    },
    CommandSpec {
        name: "add borrower",
        arity: Arity::Exactly(3),
        usage: "add borrower <name>, <username>, <phone>",
        summary: "Add a borrower",
    },
    CommandSpec {
        name: "rm borrower",
        arity: Arity::Exactly(1),
        usage: "rm borrower <username>",
        summary: "Remove a borrower and return their books",
    },
    CommandSpec {
        name: "edit borrower",
        arity: Arity::Exactly(3),
        usage: "edit borrower <username>, <new name>, <new phone>",
        summary: "Replace a borrower's name and phone",
    },
    CommandSpec {
        name: "borrowed by",
        arity: Arity::Exactly(1),
        usage: "borrowed by <username>",
        summary: "Show the books a borrower holds",
    },
    CommandSpec {
        name: "search borrowers",
        arity: Arity::Exactly(2),
        usage: "search borrowers <name|username>, <query>",
        summary: "Find borrowers by name or username",
    },
    CommandSpec {
        name: "list borrowers",
        arity: Arity::Exactly(0),
        usage: "list borrowers",
        summary: "List every borrower, grouped by name",
    },
    CommandSpec {
        name: "check indexes",
        arity: Arity::Exactly(0),
        usage: "check indexes",
        summary: "Audit every index against the records",
    },
];

/// Find a command's table row by name.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// A validated, typed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a new book
    AddBook {
        /// The book to add
        book: Book,
    },
    /// Remove a book
    RemoveBook {
        /// Book to remove
        isbn: String,
    },
    /// Replace a book's attributes
    EditBook {
        /// New attributes; the isbn selects the book
        book: Book,
    },
    /// Search books
    SearchBooks {
        /// Attribute to match
        by: BookSearch,
        /// Exact value to match
        query: String,
    },
    /// List every book
    ListBooks {
        /// Grouping and order
        by: BookSort,
    },
    /// Check a book out
    Checkout {
        /// Book to check out
        isbn: String,
        /// Borrower receiving it
        username: String,
    },
    /// Look up a book's borrower
    BorrowerOf {
        /// Book to look up
        isbn: String,
    },
    /// Add a new borrower
    AddBorrower {
        /// The borrower to add
        borrower: Borrower,
    },
    /// Remove a borrower
    RemoveBorrower {
        /// Borrower to remove
        username: String,
    },
    /// Replace a borrower's attributes
    EditBorrower {
        /// New attributes; the username selects the borrower
        borrower: Borrower,
    },
    /// Books a borrower holds
    BorrowedBy {
        /// Borrower to look up
        username: String,
    },
    /// Search borrowers
    SearchBorrowers {
        /// Attribute to match
        by: BorrowerSearch,
        /// Exact value to match
        query: String,
    },
    /// List every borrower
    ListBorrowers,
    /// Audit the indexes
    CheckIndexes,
}

impl Command {
    /// Build a command from its name and positional arguments.
    ///
    /// Unknown names are `UnknownCommand`; a wrong argument count or an
    /// unrecognized search or sort type is `InvalidArgument`. Arguments are
    /// otherwise taken as given.
    pub fn parse(name: &str, args: &[String]) -> Result<Self> {
        let spec = lookup(name).ok_or_else(|| Error::UnknownCommand {
            command: name.to_string(),
        })?;
        if !spec.arity.accepts(args.len()) {
            return Err(Error::InvalidArgument {
                reason: format!(
                    "'{}' takes {}. Usage: {}",
                    spec.name, spec.arity, spec.usage
                ),
            });
        }

        let command = match (spec.name, args) {
            ("add book", _) => Command::AddBook {
                book: Book::from_args(args)?,
            },
            ("rm book", [isbn]) => Command::RemoveBook { isbn: isbn.clone() },
            ("edit book", _) => Command::EditBook {
                book: Book::from_edit_args(args)?,
            },
            ("search books", [by, query]) => Command::SearchBooks {
                by: by.parse()?,
                query: query.clone(),
            },
            ("list books", [by]) => Command::ListBooks { by: by.parse()? },
            ("checkout book", [isbn, username]) => Command::Checkout {
                isbn: isbn.clone(),
                username: username.clone(),
            },
            ("borrower of", [isbn]) => Command::BorrowerOf { isbn: isbn.clone() },
            ("add borrower", _) => Command::AddBorrower {
                borrower: Borrower::from_args(args)?,
            },
            ("rm borrower", [username]) => Command::RemoveBorrower {
                username: username.clone(),
            },
            ("edit borrower", _) => Command::EditBorrower {
                borrower: Borrower::from_edit_args(args)?,
            },
            ("borrowed by", [username]) => Command::BorrowedBy {
                username: username.clone(),
            },
            ("search borrowers", [by, query]) => Command::SearchBorrowers {
                by: by.parse()?,
                query: query.clone(),
            },
            ("list borrowers", []) => Command::ListBorrowers,
            ("check indexes", []) => Command::CheckIndexes,
            _ => {
                return Err(Error::Internal {
                    reason: format!("no argument mapping for '{}'", spec.name),
                })
            }
        };
        Ok(command)
    }

    /// The command's table name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddBook { .. } => "add book",
            Command::RemoveBook { .. } => "rm book",
            Command::EditBook { .. } => "edit book",
            Command::SearchBooks { .. } => "search books",
            Command::ListBooks { .. } => "list books",
            Command::Checkout { .. } => "checkout book",
            Command::BorrowerOf { .. } => "borrower of",
            Command::AddBorrower { .. } => "add borrower",
            Command::RemoveBorrower { .. } => "rm borrower",
            Command::EditBorrower { .. } => "edit borrower",
            Command::BorrowedBy { .. } => "borrowed by",
            Command::SearchBorrowers { .. } => "search borrowers",
            Command::ListBorrowers => "list borrowers",
            Command::CheckIndexes => "check indexes",
        }
    }
}
