//! ThinqScribe Storage
//!
//! Whole-value key-value storage for client-side state. Every write replaces
//! the full value stored under a key, so callers never observe partial
//! updates and need no transactional discipline.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local map, also used to simulate an unavailable
//!   store in tests
//! - [`FileStore`]: one file per key inside a data directory
//!
//! # Example
//!
//! ```rust,ignore
//! use thinq_storage::{KeyValueStore, KeyValueStoreExt, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set_json("thinqscribe-selected-model", &"gpt-4o")?;
//! let model: Option<String> = store.get_json("thinqscribe-selected-model")?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{KeyValueStore, KeyValueStoreExt, SharedStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
