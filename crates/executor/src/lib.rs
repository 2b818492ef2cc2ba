//! Command layer for the Stacks catalog.
//!
//! This crate sits between the shell and the engine:
//! - [`Command`]: typed commands built once from a name and argument list,
//!   validated against the [`COMMANDS`] table
//! - [`Executor`]: runs a command against a `Catalog`
//! - [`Output`]: typed results whose `Display` is the operator-facing text
//! - [`Error`]: operator-facing failures, converted from `StacksError`
//! - [`Stacks`]: typed async API for embedding the catalog
//!
//! A malformed command is an `Err`, never a missing response.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod api;
mod command;
mod convert;
mod error;
mod executor;
mod handlers;
mod output;

pub use api::Stacks;
pub use command::{lookup, Arity, Command, CommandSpec, COMMANDS};
pub use error::{Error, Result};
pub use executor::Executor;
pub use output::Output;

pub use stacks_engine::{BookSearch, BookSort, BorrowerSearch, Group, IndexViolation};
