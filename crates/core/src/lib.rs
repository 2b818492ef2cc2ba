//! Core types for the Stacks library catalog.
//!
//! This crate defines the pieces every other layer shares:
//! - [`error`]: The catalog error taxonomy (`StacksError`, `StacksResult`)
//! - [`keys`]: The physical key naming scheme for records and indexes
//! - [`model`]: Book and Borrower record models and their typed inputs
//!
//! Nothing here performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod keys;
pub mod model;

pub use error::{EntityRef, StacksError, StacksResult};
pub use model::{Book, Borrower};
