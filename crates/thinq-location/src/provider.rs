//! Geolocation providers

use crate::config::LocationConfig;
use crate::error::LocationError;
use crate::normalize::RawLocation;
use async_trait::async_trait;
use std::time::Duration;

/// Source of raw geolocation data for the current client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Look up the caller's location
    ///
    /// # Errors
    /// Any transport, status, or decode failure.
    async fn fetch(&self) -> Result<RawLocation, LocationError>;
}

/// Provider that GETs a JSON geolocation endpoint
#[derive(Debug, Clone)]
pub struct HttpGeoProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGeoProvider {
    /// Create provider with a request timeout
    ///
    /// # Errors
    /// `LocationError::Client` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LocationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("thinqscribe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(LocationError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create provider from cache configuration
    ///
    /// # Errors
    /// `LocationError::Client` if the HTTP client cannot be built.
    pub fn from_config(config: &LocationConfig) -> Result<Self, LocationError> {
        Self::new(config.endpoint.clone(), config.request_timeout)
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GeoProvider for HttpGeoProvider {
    async fn fetch(&self) -> Result<RawLocation, LocationError> {
        tracing::debug!("Requesting location from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(LocationError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Status(status.as_u16()));
        }

        response
            .json::<RawLocation>()
            .await
            .map_err(LocationError::Decode)
    }
}
