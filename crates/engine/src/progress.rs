//! Step tracking for multi-key operations.
//!
//! An engine operation touches several keys with no atomicity across them.
//! Every step runs even after an earlier one failed (no rollback), and the
//! failed steps are named in the final error so the operator knows which
//! parts of the catalog to re-check.

use stacks_core::{StacksError, StacksResult};

#[derive(Debug, Default)]
pub(crate) struct Progress {
    failed: Vec<String>,
}

impl Progress {
    /// Record the outcome of one step.
    pub(crate) fn step(&mut self, ok: bool, what: impl Into<String>) {
        if !ok {
            self.failed.push(what.into());
        }
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Ok` if every step succeeded, otherwise `StoreUnavailable` naming the
    /// failed steps.
    pub(crate) fn finish(self, action: impl std::fmt::Display) -> StacksResult<()> {
        if self.failed.is_empty() {
            return Ok(());
        }
        Err(StacksError::store_unavailable(format!(
            "{} did not complete; failed to update {}",
            action,
            self.failed.join(", ")
        )))
    }
}
