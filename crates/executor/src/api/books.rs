//! Book operations.

use stacks_core::Book;
use stacks_engine::{BookSearch, BookSort, Group};

use super::{unexpected, Stacks};
use crate::{Command, Output, Result};

impl Stacks {
    /// Add a book.
    pub async fn add_book(
        &self,
        name: &str,
        authors: &[&str],
        isbn: &str,
        pages: &str,
    ) -> Result<()> {
        let book = Book {
            name: name.to_string(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            isbn: isbn.to_string(),
            pages: pages.to_string(),
        };
        match self.executor.execute(Command::AddBook { book }).await? {
            Output::BookAdded { .. } => Ok(()),
            other => Err(unexpected("add book", &other)),
        }
    }

    /// Remove a book.
    pub async fn remove_book(&self, isbn: &str) -> Result<()> {
        match self
            .executor
            .execute(Command::RemoveBook {
                isbn: isbn.to_string(),
            })
            .await?
        {
            Output::BookRemoved { .. } => Ok(()),
            other => Err(unexpected("rm book", &other)),
        }
    }

    /// Replace a book's name, authors and page count.
    pub async fn edit_book(&self, book: Book) -> Result<()> {
        match self.executor.execute(Command::EditBook { book }).await? {
            Output::BookEdited { .. } => Ok(()),
            other => Err(unexpected("edit book", &other)),
        }
    }

    /// Search books by name, author or isbn.
    pub async fn search_books(&self, by: BookSearch, query: &str) -> Result<Vec<Book>> {
        match self
            .executor
            .execute(Command::SearchBooks {
                by,
                query: query.to_string(),
            })
            .await?
        {
            Output::Books { books, .. } => Ok(books),
            other => Err(unexpected("search books", &other)),
        }
    }

    /// List every book, grouped.
    pub async fn list_books(&self, by: BookSort) -> Result<Vec<Group<Book>>> {
        match self.executor.execute(Command::ListBooks { by }).await? {
            Output::BookListing { groups, .. } => Ok(groups),
            other => Err(unexpected("list books", &other)),
        }
    }

    /// Check a book out to a borrower.
    pub async fn checkout(&self, isbn: &str, username: &str) -> Result<()> {
        match self
            .executor
            .execute(Command::Checkout {
                isbn: isbn.to_string(),
                username: username.to_string(),
            })
            .await?
        {
            Output::CheckedOut { .. } => Ok(()),
            other => Err(unexpected("checkout book", &other)),
        }
    }

    /// The book's current borrower, if any.
    pub async fn borrower_of(&self, isbn: &str) -> Result<Option<String>> {
        match self
            .executor
            .execute(Command::BorrowerOf {
                isbn: isbn.to_string(),
            })
            .await?
        {
            Output::BorrowerOf { username, .. } => Ok(username),
            other => Err(unexpected("borrower of", &other)),
        }
    }
}
