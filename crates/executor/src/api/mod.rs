//! Typed embedded API.
//!
//! [`Stacks`] wraps an [`Executor`] and offers one async method per
//! command, returning typed values instead of [`Output`]:
//!
//! ```ignore
//! use stacks_executor::Stacks;
//!
//! let stacks = Stacks::in_memory();
//! stacks.add_book("Dune", &["Herbert"], "111", "412").await?;
//! let found = stacks.search_books(BookSearch::Isbn, "111").await?;
//! ```
//!
//! [`Output`]: crate::Output

mod books;
mod borrowers;

use std::sync::Arc;

use stacks_engine::IndexViolation;
use stacks_storage::PrimitiveStore;

use crate::{Command, Error, Executor, Output, Result};

/// Embedded handle to a catalog.
#[derive(Debug, Clone)]
pub struct Stacks {
    executor: Executor,
}

impl Stacks {
    /// Open a catalog over a store handle.
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        Self {
            executor: Executor::with_store(store),
        }
    }

    /// Open a catalog over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self {
            executor: Executor::in_memory(),
        }
    }

    /// The underlying executor.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Check that the store answers.
    pub async fn ping(&self) -> Result<()> {
        Ok(self.executor.catalog().ping().await?)
    }

    /// Audit every index against the records.
    pub async fn check_indexes(&self) -> Result<Vec<IndexViolation>> {
        match self.executor.execute(Command::CheckIndexes).await? {
            Output::IndexReport { violations } => Ok(violations),
            other => Err(unexpected("check indexes", &other)),
        }
    }
}

fn unexpected(command: &str, output: &Output) -> Error {
    Error::Internal {
        reason: format!("Unexpected output for {}: {:?}", command, output),
    }
}
