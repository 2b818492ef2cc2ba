//! Stacks: a library catalog over a Redis-style primitive store.
//!
//! Books and borrowers are stored as flat hashes. Every lookup other than
//! by primary key goes through hand-maintained secondary indexes, which the
//! engine keeps consistent across add, remove, edit and checkout.
//!
//! ```no_run
//! # async fn demo() -> stacks::Result<()> {
//! let stacks = stacks::Stacks::in_memory();
//! stacks.add_book("Dune", &["Herbert"], "111", "412").await?;
//! stacks.add_borrower("Sam", "sam1", "555-0100").await?;
//! stacks.checkout("111", "sam1").await?;
//! assert_eq!(stacks.borrower_of("111").await?, Some("sam1".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! The pieces live in separate crates, re-exported here:
//! - `stacks-core`: records, keys, errors
//! - `stacks-storage`: the store trait, the in-memory backend and adapter
//! - `stacks-engine`: index maintenance and audit
//! - `stacks-executor`: commands, outputs and the typed API

#![warn(missing_docs)]
#![warn(clippy::all)]

mod types;

pub use types::*;

/// Result type of the typed API.
pub type Result<T> = stacks_executor::Result<T>;
