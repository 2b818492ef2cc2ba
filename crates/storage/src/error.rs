//! Store-level errors.

/// Result type for primitive store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by a primitive store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not serve the call (transport failure).
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// What went wrong
        reason: String,
    },

    /// The key holds a different kind of primitive.
    #[error("WRONGTYPE key '{key}' does not hold a {expected}")]
    WrongType {
        /// The offending key
        key: String,
        /// The primitive kind the call needed
        expected: &'static str,
    },

    /// Snapshot file could not be written or read back.
    #[error("snapshot error: {reason}")]
    Snapshot {
        /// What went wrong
        reason: String,
    },
}

impl StoreError {
    /// Create an Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a Snapshot error.
    pub fn snapshot(reason: impl Into<String>) -> Self {
        StoreError::Snapshot {
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for stacks_core::StacksError {
    fn from(err: StoreError) -> Self {
        stacks_core::StacksError::store_unavailable(err.to_string())
    }
}
