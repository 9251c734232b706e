//! Canonical payment status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UI-facing payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Money received
    Paid,
    /// Awaiting payment
    Pending,
    /// Gateway still settling
    Processing,
    /// Payment attempt failed
    Failed,
    /// Payment cancelled by either side
    Cancelled,
}

impl PaymentStatus {
    /// All canonical statuses
    pub const ALL: [Self; 5] = [
        Self::Paid,
        Self::Pending,
        Self::Processing,
        Self::Failed,
        Self::Cancelled,
    ];

    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether no further state change is expected
    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Paid | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw status string matched no known status or alias
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment status: '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for PaymentStatus {
    type Err = ParseStatusError;

    /// Case-insensitive, whitespace-trimmed, accepts gateway aliases
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "paid" | "completed" | "success" | "succeeded" => Ok(Self::Paid),
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "failed" | "error" | "declined" => Ok(Self::Failed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(raw.to_string())),
        }
    }
}
