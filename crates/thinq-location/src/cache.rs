//! Single-flight location cache
//!
//! The in-memory layer is a one-entry moka cache. Coalesced entry
//! initialization means concurrent misses await the same lookup, and the
//! per-entry expiry is derived from the record timestamp, so a record
//! restored from the persistent store keeps its original age.

use crate::config::LocationConfig;
use crate::error::{LocationError, SharedLocationError};
use crate::normalize::normalize;
use crate::provider::GeoProvider;
use crate::record::LocationRecord;
use chrono::Utc;
use moka::future::Cache;
use moka::Expiry;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thinq_storage::{KeyValueStore, KeyValueStoreExt, SharedStore};

/// Persistent store key for the cached record
pub const STORAGE_KEY: &str = "thinqscribe-location";

const MEMORY_KEY: &str = "location";

/// Layer that produced a resolved record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationSource {
    /// In-memory hit, or joined another caller's lookup
    Memory,
    /// Restored from the persistent store
    Persisted,
    /// Fetched from the provider
    Network,
}

/// Record plus the layer it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Location record
    pub record: LocationRecord,
    /// Where it came from
    pub source: LocationSource,
}

/// Expire entries when their record leaves the validity window
struct RecordExpiry {
    ttl: Duration,
}

impl RecordExpiry {
    fn remaining(&self, value: &ResolvedLocation) -> Option<Duration> {
        Some(value.record.remaining(self.ttl, Utc::now()))
    }
}

impl Expiry<&'static str, ResolvedLocation> for RecordExpiry {
    fn expire_after_create(
        &self,
        _key: &&'static str,
        value: &ResolvedLocation,
        _created_at: Instant,
    ) -> Option<Duration> {
        self.remaining(value)
    }

    fn expire_after_update(
        &self,
        _key: &&'static str,
        value: &ResolvedLocation,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        self.remaining(value)
    }
}

/// Geolocation cache with in-memory, persistent, and network layers
///
/// Construct once at startup and share it; there is no global instance.
pub struct LocationCache {
    provider: Arc<dyn GeoProvider>,
    store: SharedStore,
    config: LocationConfig,
    memory: Cache<&'static str, ResolvedLocation>,
}

impl LocationCache {
    /// Create cache over a provider and a persistent store
    #[must_use]
    pub fn new(provider: Arc<dyn GeoProvider>, store: SharedStore, config: LocationConfig) -> Self {
        let memory = Cache::builder()
            .max_capacity(1)
            .expire_after(RecordExpiry { ttl: config.ttl })
            .build();

        Self {
            provider,
            store,
            config,
            memory,
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LocationConfig {
        &self.config
    }

    /// Current location, never failing
    ///
    /// Serves a fresh cached record unless `force_refresh` is set. Any lookup
    /// failure is logged and answered with [`LocationRecord::fallback`], which
    /// is not cached so the next call tries again.
    pub async fn get_location(&self, force_refresh: bool) -> LocationRecord {
        match self.resolve(force_refresh).await {
            Ok(resolved) => resolved.record,
            Err(e) => {
                tracing::warn!(
                    "Location lookup failed (retryable: {}), using fallback: {}",
                    e.is_retryable(),
                    e
                );
                LocationRecord::fallback(Utc::now())
            }
        }
    }

    /// Current location with its source, or the lookup error
    ///
    /// Concurrent callers that miss the in-memory layer share a single
    /// lookup; all of them receive its record or its error. A forced refresh
    /// never joins that lookup: it always calls the provider itself and
    /// replaces the in-memory entry on success.
    ///
    /// # Errors
    /// The provider error when no cached record is usable and the fetch
    /// fails. Storage failures never surface here.
    pub async fn resolve(&self, force_refresh: bool) -> Result<ResolvedLocation, SharedLocationError> {
        if force_refresh {
            tracing::debug!("Forcing location refresh");
            let resolved = self.load(true).await.map_err(Arc::new)?;
            self.memory.insert(MEMORY_KEY, resolved.clone()).await;
            return Ok(resolved);
        }

        let entry = self
            .memory
            .entry(MEMORY_KEY)
            .or_try_insert_with(self.load(false))
            .await?;

        if entry.is_fresh() {
            Ok(entry.into_value())
        } else {
            tracing::debug!("Location served from memory");
            let mut resolved = entry.into_value();
            resolved.source = LocationSource::Memory;
            Ok(resolved)
        }
    }

    /// In-memory record, without any lookup
    pub async fn cached(&self) -> Option<LocationRecord> {
        self.memory.get(&MEMORY_KEY).await.map(|r| r.record)
    }

    /// Drop the in-memory and persisted records
    pub async fn clear_cache(&self) {
        self.memory.invalidate(&MEMORY_KEY).await;
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            tracing::warn!("Failed to clear persisted location: {}", e);
        }
        tracing::info!("Location cache cleared");
    }

    /// Persistent layer then provider; runs once per coalesced miss
    async fn load(&self, skip_persisted: bool) -> Result<ResolvedLocation, LocationError> {
        if !skip_persisted {
            if let Some(record) = self.read_persisted() {
                tracing::debug!("Location restored from storage ({})", record.country_code);
                return Ok(ResolvedLocation {
                    record,
                    source: LocationSource::Persisted,
                });
            }
        }

        let raw = self.provider.fetch().await?;
        let record = normalize(&raw, self.config.client_timezone.as_deref(), Utc::now());
        tracing::info!(
            "Location detected: {} ({}), currency {}",
            record.city,
            record.country_code,
            record.currency
        );

        if let Err(e) = self.store.set_json(STORAGE_KEY, &record) {
            tracing::warn!("Failed to persist location: {}", e);
        }

        Ok(ResolvedLocation {
            record,
            source: LocationSource::Network,
        })
    }

    /// Fresh persisted record; stale or corrupt entries are removed
    fn read_persisted(&self) -> Option<LocationRecord> {
        match self.store.get_json::<LocationRecord>(STORAGE_KEY) {
            Ok(Some(record)) if record.is_fresh(self.config.ttl, Utc::now()) => Some(record),
            Ok(Some(_)) => {
                tracing::debug!("Persisted location is stale");
                self.discard_persisted();
                None
            }
            Ok(None) => None,
            Err(e) if e.is_corrupt() => {
                tracing::warn!("Discarding unreadable persisted location: {}", e);
                self.discard_persisted();
                None
            }
            Err(e) => {
                tracing::warn!("Persisted location unavailable: {}", e);
                None
            }
        }
    }

    fn discard_persisted(&self) {
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            tracing::warn!("Failed to remove persisted location: {}", e);
        }
    }
}

impl fmt::Debug for LocationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationCache")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("entries", &self.memory.entry_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::RawLocation;
    use crate::provider::MockGeoProvider;
    use chrono::Duration as ChronoDuration;
    use thinq_storage::MemoryStore;

    fn lagos() -> RawLocation {
        RawLocation {
            country: Some("Nigeria".to_string()),
            country_code: Some("NG".to_string()),
            city: Some("Lagos".to_string()),
            ..RawLocation::default()
        }
    }

    fn london() -> RawLocation {
        RawLocation {
            country: Some("United Kingdom".to_string()),
            country_code: Some("GB".to_string()),
            city: Some("London".to_string()),
            currency: Some("GBP".to_string()),
            exchange_rate: Some(0.79),
            ..RawLocation::default()
        }
    }

    fn config() -> LocationConfig {
        LocationConfig::new().with_client_timezone(None)
    }

    fn cache_with(mock: MockGeoProvider, store: Arc<MemoryStore>) -> LocationCache {
        LocationCache::new(Arc::new(mock), store, config())
    }

    #[tokio::test]
    async fn second_call_is_served_from_memory() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(1).returning(|| Ok(lagos()));
        let cache = cache_with(mock, Arc::new(MemoryStore::new()));

        let first = cache.resolve(false).await.unwrap();
        let second = cache.resolve(false).await.unwrap();

        assert_eq!(first.source, LocationSource::Network);
        assert_eq!(second.source, LocationSource::Memory);
        assert_eq!(first.record, second.record);
    }

    #[tokio::test]
    async fn fetch_writes_persistent_store() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(1).returning(|| Ok(london()));
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(mock, store.clone());

        let record = cache.get_location(false).await;

        let persisted: LocationRecord = store.get_json(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(persisted, record);
        assert_eq!(persisted.currency, "gbp");
    }

    #[tokio::test]
    async fn fresh_persisted_record_skips_network() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(0);
        let store = Arc::new(MemoryStore::new());
        let stored = LocationRecord::fallback(Utc::now() - ChronoDuration::minutes(30));
        store.set_json(STORAGE_KEY, &stored).unwrap();
        let cache = cache_with(mock, store);

        let resolved = cache.resolve(false).await.unwrap();

        assert_eq!(resolved.source, LocationSource::Persisted);
        assert_eq!(resolved.record, stored);
    }

    #[tokio::test]
    async fn stale_persisted_record_is_refetched() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(1).returning(|| Ok(london()));
        let store = Arc::new(MemoryStore::new());
        let stale = LocationRecord::fallback(Utc::now() - ChronoDuration::hours(3));
        store.set_json(STORAGE_KEY, &stale).unwrap();
        let cache = cache_with(mock, store);

        let resolved = cache.resolve(false).await.unwrap();

        assert_eq!(resolved.source, LocationSource::Network);
        assert_eq!(resolved.record.country_code, "gb");
    }

    #[tokio::test]
    async fn corrupt_persisted_record_is_a_miss() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(1).returning(|| Ok(lagos()));
        let store = Arc::new(MemoryStore::new());
        store.set(STORAGE_KEY, "{\"country\":").unwrap();
        let cache = cache_with(mock, store.clone());

        let resolved = cache.resolve(false).await.unwrap();

        assert_eq!(resolved.source, LocationSource::Network);
        let persisted: Option<LocationRecord> = store.get_json(STORAGE_KEY).unwrap();
        assert_eq!(persisted, Some(resolved.record));
    }

    #[tokio::test]
    async fn force_refresh_always_fetches() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(3).returning(|| Ok(lagos()));
        let cache = cache_with(mock, Arc::new(MemoryStore::new()));

        cache.get_location(false).await;
        let forced = cache.resolve(true).await.unwrap();
        cache.get_location(true).await;

        assert_eq!(forced.source, LocationSource::Network);
    }

    #[tokio::test]
    async fn failure_returns_fallback_and_is_not_cached() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch()
            .times(2)
            .returning(|| Err(LocationError::Status(503)));
        let cache = cache_with(mock, Arc::new(MemoryStore::new()));

        let record = cache.get_location(false).await;
        assert_eq!(record.country_code, "ng");
        assert_eq!(record.currency, "ngn");
        assert!(cache.cached().await.is_none());

        let err = cache.resolve(false).await.unwrap_err();
        assert!(matches!(*err, LocationError::Status(503)));
    }

    #[tokio::test]
    async fn unavailable_store_still_resolves() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(1).returning(|| Ok(london()));
        let cache = cache_with(mock, Arc::new(MemoryStore::unavailable()));

        let first = cache.resolve(false).await.unwrap();
        let second = cache.resolve(false).await.unwrap();

        assert_eq!(first.source, LocationSource::Network);
        assert_eq!(second.source, LocationSource::Memory);
    }

    #[tokio::test]
    async fn clear_cache_forces_new_fetch() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(2).returning(|| Ok(lagos()));
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(mock, store.clone());

        cache.get_location(false).await;
        cache.clear_cache().await;

        assert!(cache.cached().await.is_none());
        assert!(store.get(STORAGE_KEY).unwrap().is_none());

        let resolved = cache.resolve(false).await.unwrap();
        assert_eq!(resolved.source, LocationSource::Network);
    }

    #[tokio::test]
    async fn short_ttl_expires_memory_entry() {
        let mut mock = MockGeoProvider::new();
        mock.expect_fetch().times(2).returning(|| Ok(lagos()));
        let cache = LocationCache::new(
            Arc::new(mock),
            Arc::new(MemoryStore::new()),
            config().with_ttl(Duration::from_millis(50)),
        );

        cache.get_location(false).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        let resolved = cache.resolve(false).await.unwrap();

        assert_eq!(resolved.source, LocationSource::Network);
    }
}
