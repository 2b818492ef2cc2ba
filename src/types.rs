//! Public types for the Stacks catalog.
//!
//! This module re-exports types from the workspace crates with one flat
//! public interface.

// ============================================================================
// Records and errors
// ============================================================================

pub use stacks_core::{Book, Borrower, EntityRef, StacksError, StacksResult};

// ============================================================================
// Store
// ============================================================================

pub use stacks_storage::{MemoryStore, PrimitiveStore, RedisStore, StoreAdapter, StoreError};

// ============================================================================
// Engine
// ============================================================================

pub use stacks_engine::{
    BookEngine, BookSearch, BookSort, BorrowerEngine, BorrowerSearch, Catalog, Group,
    IndexViolation, StacksConfig,
};

// ============================================================================
// Commands
// ============================================================================

pub use stacks_executor::{Command, Error, Executor, Output, Stacks, COMMANDS};
