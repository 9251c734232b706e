//! Storage trait and JSON helpers

use crate::error::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;

/// Whole-value string storage keyed by name
///
/// Mirrors the browser `localStorage` contract: values are opaque strings,
/// writes replace the previous value, and a missing key reads as `None`.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Read the value under `key`
    ///
    /// # Errors
    /// Backend failures. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value under `key`
    ///
    /// # Errors
    /// Backend failures or an unsupported key.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    /// Backend failures.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Shared, dynamically dispatched store handle
pub type SharedStore = Arc<dyn KeyValueStore>;

/// JSON convenience methods for every [`KeyValueStore`]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and deserialize the value under `key`
    ///
    /// # Errors
    /// - `StorageError::Corrupt` if the value is not valid JSON for `T`
    /// - backend failures
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    /// Serialize `value` and store it under `key`
    ///
    /// # Errors
    /// Serialization or backend failures.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
