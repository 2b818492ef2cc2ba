//! Book command handlers.

use stacks_core::Book;
use stacks_engine::{BookSearch, BookSort, Catalog};

use crate::{Output, Result};

/// Handle `add book`.
pub async fn add_book(catalog: &Catalog, book: Book) -> Result<Output> {
    catalog.books().add(&book).await?;
    Ok(Output::BookAdded { isbn: book.isbn })
}

/// Handle `rm book`.
pub async fn remove_book(catalog: &Catalog, isbn: String) -> Result<Output> {
    catalog.books().remove(&isbn).await?;
    Ok(Output::BookRemoved { isbn })
}

/// Handle `edit book`.
pub async fn edit_book(catalog: &Catalog, book: Book) -> Result<Output> {
    catalog.books().edit(&book).await?;
    Ok(Output::BookEdited { isbn: book.isbn })
}

/// Handle `search books`.
pub async fn search_books(catalog: &Catalog, by: BookSearch, query: String) -> Result<Output> {
    let books = catalog.books().search(by, &query).await;
    Ok(Output::Books { by, query, books })
}

/// Handle `list books`.
pub async fn list_books(catalog: &Catalog, by: BookSort) -> Result<Output> {
    let groups = catalog.books().list(by).await;
    Ok(Output::BookListing { by, groups })
}

/// Handle `checkout book`.
pub async fn checkout(catalog: &Catalog, isbn: String, username: String) -> Result<Output> {
    catalog.books().checkout(&isbn, &username).await?;
    Ok(Output::CheckedOut { isbn, username })
}

/// Handle `borrower of`.
pub async fn borrower_of(catalog: &Catalog, isbn: String) -> Result<Output> {
    let username = catalog.books().borrower_of(&isbn).await;
    Ok(Output::BorrowerOf { isbn, username })
}
