//! Error types for chat persistence

use thinq_storage::StorageError;

/// Errors from the `try_*` persistence operations
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Underlying store failed or held unreadable data
    #[error("chat storage error: {0}")]
    Storage(#[from] StorageError),

    /// No persisted conversation has this id
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),
}

impl PersistenceError {
    /// Whether the failure is bad stored data rather than a backend problem
    #[inline]
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_corrupt())
    }
}

/// Result type alias for chat persistence
pub type PersistenceResult<T> = Result<T, PersistenceError>;
