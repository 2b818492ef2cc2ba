//! The catalog: both engine halves over one store handle.

use std::sync::Arc;

use stacks_core::StacksResult;
use stacks_storage::{PrimitiveStore, StoreAdapter};

use crate::audit::{self, IndexViolation};
use crate::books::BookEngine;
use crate::borrowers::BorrowerEngine;

/// Book and borrower engines sharing a store.
///
/// The store handle is injected at construction; nothing here is global.
/// Clones share the store.
#[derive(Debug, Clone)]
pub struct Catalog {
    store: StoreAdapter,
    books: BookEngine,
    borrowers: BorrowerEngine,
}

impl Catalog {
    /// Build a catalog over a primitive store.
    pub fn new(store: Arc<dyn PrimitiveStore>) -> Self {
        let store = StoreAdapter::new(store);
        Self {
            books: BookEngine::new(store.clone()),
            borrowers: BorrowerEngine::new(store.clone()),
            store,
        }
    }

    /// Book operations.
    pub fn books(&self) -> &BookEngine {
        &self.books
    }

    /// Borrower operations.
    pub fn borrowers(&self) -> &BorrowerEngine {
        &self.borrowers
    }

    /// The adapter both engines use.
    pub fn store(&self) -> &StoreAdapter {
        &self.store
    }

    /// Check that the store answers.
    pub async fn ping(&self) -> StacksResult<()> {
        self.store.ping().await
    }

    /// Report every inconsistency between records and indexes.
    pub async fn audit(&self) -> Vec<IndexViolation> {
        audit::audit(&self.store).await
    }
}
