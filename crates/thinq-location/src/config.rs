//! Location cache configuration

use std::time::Duration;

/// Default geolocation endpoint
pub const DEFAULT_ENDPOINT: &str = "https://ipapi.co/json/";

/// Records older than this are refetched
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Upper bound on a single geolocation request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Location cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationConfig {
    /// Geolocation endpoint URL
    pub endpoint: String,
    /// Validity window for a cached record
    pub ttl: Duration,
    /// Timeout for one provider request
    pub request_timeout: Duration,
    /// IANA timezone of this client, used by the Lagos heuristic
    pub client_timezone: Option<String>,
}

impl LocationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With endpoint URL
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With validity window
    #[inline]
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// With client timezone
    #[inline]
    #[must_use]
    pub fn with_client_timezone(mut self, timezone: Option<String>) -> Self {
        self.client_timezone = timezone;
        self
    }
}

impl Default for LocationConfig {
    /// Defaults, with the client timezone read from `TZ`
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ttl: DEFAULT_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            client_timezone: std::env::var("TZ").ok().filter(|tz| !tz.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides() {
        let config = LocationConfig::new()
            .with_endpoint("http://localhost:9000/geo")
            .with_ttl(Duration::from_secs(60))
            .with_request_timeout(Duration::from_secs(1))
            .with_client_timezone(Some("Africa/Lagos".to_string()));

        assert_eq!(config.endpoint, "http://localhost:9000/geo");
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.client_timezone.as_deref(), Some("Africa/Lagos"));
    }

    #[test]
    fn default_window_is_two_hours() {
        assert_eq!(LocationConfig::default().ttl, Duration::from_secs(7200));
    }
}
