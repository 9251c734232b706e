//! ThinqScribe Payments
//!
//! Display-side payment logic:
//! - Collapse raw backend payment states into a canonical [`PaymentStatus`]
//! - Name the supported payment gateways
//!
//! # Example
//!
//! ```rust,ignore
//! use thinq_payments::{normalize, PaymentRecord, PaymentStatus};
//!
//! let record = PaymentRecord::with_status("processing");
//! assert_eq!(normalize(&record), PaymentStatus::Paid);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod gateway;
pub mod normalize;
pub mod record;
pub mod status;

pub use gateway::PaymentGateway;
pub use normalize::normalize;
pub use record::{PaymentDate, PaymentRecord};
pub use status::{ParseStatusError, PaymentStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
