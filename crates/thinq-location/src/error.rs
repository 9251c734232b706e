//! Error types for location lookup

use std::sync::Arc;
use thinq_storage::StorageError;

/// Errors during a location lookup
///
/// None of these reach [`LocationCache::get_location`](crate::LocationCache::get_location)
/// callers; they are logged and replaced by the fallback record.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// HTTP client could not be built
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// Request failed before a response arrived (DNS, connect, timeout)
    #[error("geolocation request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("geolocation endpoint returned status {0}")]
    Status(u16),

    /// Response body was not a location object
    #[error("geolocation response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    /// Persistent cache failure
    #[error("location storage error: {0}")]
    Storage(#[from] StorageError),
}

impl LocationError {
    /// Check if a later attempt could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status(code) => *code == 429 || *code >= 500,
            Self::Client(_) | Self::Decode(_) | Self::Storage(_) => false,
        }
    }
}

/// Lookup error shared by every caller that joined the same in-flight fetch
pub type SharedLocationError = Arc<LocationError>;
