//! Error types for key-value storage

use std::path::PathBuf;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore)
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backend is not usable (quota exceeded, disabled, private mode)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Key contains characters the backend cannot store
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// Stored value is not valid JSON for the requested type
    #[error("corrupt value under '{key}': {source}")]
    Corrupt {
        /// Key holding the value
        key: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized
    #[error("failed to serialize value for '{key}': {source}")]
    Serialize {
        /// Key being written
        key: String,
        /// Serialization failure
        #[source]
        source: serde_json::Error,
    },

    /// IO error from a file-backed store
    #[error("io error at {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the stored data itself is bad, as opposed to the backend
    #[inline]
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_display() {
        let err = StorageError::InvalidKey("a/b".to_string());
        assert_eq!(err.to_string(), "invalid storage key: 'a/b'");
    }

    #[test]
    fn corrupt_is_flagged() {
        let source = serde_json::from_str::<u32>("{").unwrap_err();
        let err = StorageError::Corrupt {
            key: "k".to_string(),
            source,
        };
        assert!(err.is_corrupt());
        assert!(!StorageError::Unavailable("quota".into()).is_corrupt());
    }
}
