//! Application configuration loaded from TOML
//!
//! ```toml
//! [location]
//! endpoint = "https://ipapi.co/json/"
//! ttl_secs = 7200
//! timeout_secs = 10
//! timezone = "Africa/Lagos"
//!
//! [storage]
//! data_dir = ".thinqscribe"
//! ```
//!
//! Every field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thinq_location::config::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TTL};
use thinq_location::LocationConfig;

/// Default directory for persisted client state
pub const DEFAULT_DATA_DIR: &str = ".thinqscribe";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`AppConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `[location]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSection {
    /// Geolocation endpoint URL
    pub endpoint: String,
    /// Cache validity window in seconds
    pub ttl_secs: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Client timezone override; `TZ` is used when unset
    pub timezone: Option<String>,
}

impl Default for LocationSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ttl_secs: DEFAULT_TTL.as_secs(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            timezone: None,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding one file per storage key
    pub data_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Location cache settings
    pub location: LocationSection,
    /// Storage settings
    pub storage: StorageSection,
}

impl AppConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Read or parse failures.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// With storage directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = dir.into();
        self
    }

    /// With geolocation endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.location.endpoint = endpoint.into();
        self
    }

    /// With client timezone
    #[inline]
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.location.timezone = Some(timezone.into());
        self
    }

    /// Location cache configuration derived from the `[location]` section
    #[must_use]
    pub fn location_config(&self) -> LocationConfig {
        let config = LocationConfig::new()
            .with_endpoint(self.location.endpoint.clone())
            .with_ttl(Duration::from_secs(self.location.ttl_secs))
            .with_request_timeout(Duration::from_secs(self.location.timeout_secs));

        match &self.location.timezone {
            Some(timezone) => config.with_client_timezone(Some(timezone.clone())),
            None => config,
        }
    }
}
