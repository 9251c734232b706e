//! ThinqScribe Chat
//!
//! Durable mirror of AI chat state so a restart does not lose an
//! in-progress conversation.
//!
//! Persisted state, one storage key each:
//! - conversation list and current conversation
//! - model settings and selected model
//! - last successful save time
//! - force-restore flag (persisted data should win over server data on the
//!   next load)
//!
//! The persisted copy may diverge from the server's; the last writer wins.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod keys;
pub mod persistence;
pub mod types;

pub use error::{PersistenceError, PersistenceResult};
pub use persistence::ChatPersistence;
pub use types::{ChatMessage, Conversation, ModelSettings, Role};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
