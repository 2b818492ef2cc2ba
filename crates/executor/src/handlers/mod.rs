//! Command handlers.
//!
//! One function per command, grouped by the engine half they drive. Each
//! handler calls the engine, converts any `StacksError` and wraps the result
//! in the matching [`crate::Output`] variant.

pub mod audit;
pub mod books;
pub mod borrowers;
