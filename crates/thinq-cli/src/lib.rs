//! ThinqScribe CLI
//!
//! Terminal front end over the location cache, chat persistence, and payment
//! status normalizer.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use commands::{payment_status, App, RestoreFlagAction};
pub use config::{AppConfig, ConfigError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
