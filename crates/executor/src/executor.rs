//! The command executor.

use std::sync::Arc;

use stacks_engine::Catalog;
use stacks_storage::{MemoryStore, PrimitiveStore};
use tracing::debug;

use crate::handlers::{audit, books, borrowers};
use crate::{Command, Output, Result};

/// Runs typed commands against a catalog.
///
/// Commands are awaited one at a time by the caller; the executor holds no
/// state besides the catalog.
#[derive(Debug, Clone)]
pub struct Executor {
    catalog: Catalog,
}

impl Executor {
    /// Create an executor over a catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Create an executor over a store handle.
    pub fn with_store(store: Arc<dyn PrimitiveStore>) -> Self {
        Self::new(Catalog::new(store))
    }

    /// Create an executor over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// The catalog commands run against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Execute one command.
    pub async fn execute(&self, command: Command) -> Result<Output> {
        debug!(target: "stacks::executor", command = command.name(), "Executing");
        let catalog = &self.catalog;
        let result = match command {
            Command::AddBook { book } => books::add_book(catalog, book).await,
            Command::RemoveBook { isbn } => books::remove_book(catalog, isbn).await,
            Command::EditBook { book } => books::edit_book(catalog, book).await,
            Command::SearchBooks { by, query } => books::search_books(catalog, by, query).await,
            Command::ListBooks { by } => books::list_books(catalog, by).await,
            Command::Checkout { isbn, username } => books::checkout(catalog, isbn, username).await,
            Command::BorrowerOf { isbn } => books::borrower_of(catalog, isbn).await,
            Command::AddBorrower { borrower } => borrowers::add_borrower(catalog, borrower).await,
            Command::RemoveBorrower { username } => {
                borrowers::remove_borrower(catalog, username).await
            }
            Command::EditBorrower { borrower } => {
                borrowers::edit_borrower(catalog, borrower).await
            }
            Command::BorrowedBy { username } => borrowers::borrowed_by(catalog, username).await,
            Command::SearchBorrowers { by, query } => {
                borrowers::search_borrowers(catalog, by, query).await
            }
            Command::ListBorrowers => borrowers::list_borrowers(catalog).await,
            Command::CheckIndexes => audit::check_indexes(catalog).await,
        };
        if let Err(e) = &result {
            debug!(target: "stacks::executor", error = %e, "Command failed");
        }
        result
    }

    /// Parse a command name and arguments, then execute it.
    pub async fn execute_args(&self, name: &str, args: &[String]) -> Result<Output> {
        let command = Command::parse(name, args)?;
        self.execute(command).await
    }
}
