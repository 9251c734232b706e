//! ThinqScribe Location
//!
//! Best-effort geolocation and currency recommendation for pricing display.
//!
//! # Lookup layers
//!
//! ```text
//! caller → in-memory (moka, per-record TTL)
//!            ↓ miss
//!          persistent store (thinqscribe-location)
//!            ↓ miss or stale
//!          GeoProvider (HTTP)  ── failure ──→ Nigeria/Lagos/NGN fallback
//! ```
//!
//! Concurrent misses share one provider call. The cache is an explicit
//! object: build it once and hand clones of the `Arc` to consumers.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use thinq_location::{HttpGeoProvider, LocationCache, LocationConfig};
//! use thinq_storage::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LocationConfig::new();
//! let provider = HttpGeoProvider::from_config(&config)?;
//! let cache = LocationCache::new(Arc::new(provider), Arc::new(MemoryStore::new()), config);
//!
//! let location = cache.get_location(false).await;
//! println!("{} {}", location.flag, location.format_amount(10.0));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod record;

pub use cache::{LocationCache, LocationSource, ResolvedLocation, STORAGE_KEY};
pub use config::LocationConfig;
pub use error::{LocationError, SharedLocationError};
pub use normalize::{normalize, RawLocation, NGN_EXCHANGE_RATE};
pub use provider::{GeoProvider, HttpGeoProvider};
pub use record::LocationRecord;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
