//! Storage layer for Stacks
//!
//! This crate provides the primitive operations the catalog engine is built on:
//! - `PrimitiveStore`: async contract over hashes, lists, sets and sorted sets
//! - `MemoryStore`: in-process backend with Redis semantics
//! - `RedisStore`: backend over a Redis server
//! - `StoreAdapter`: conservative policy layer the engine talks to
//! - `FaultyStore`: wrapper that fails chosen calls, for partial-failure tests
//! - Snapshot save/load for `MemoryStore`
//!
//! The store offers no multi-key atomicity. Callers that touch several keys
//! are responsible for ordering their calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod error;
pub mod fault;
pub mod memory;
pub mod redis_store;
mod snapshot;
pub mod traits;

pub use adapter::StoreAdapter;
pub use error::{StoreError, StoreResult};
pub use fault::{FaultRule, FaultyStore, StoreOp};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use traits::PrimitiveStore;
