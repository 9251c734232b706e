//! Supported payment gateways

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card/checkout provider offered to a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentGateway {
    /// Stripe, used outside Africa
    Stripe,
    /// Paystack, used for African countries
    Paystack,
}

impl PaymentGateway {
    /// Gateway for a region
    #[inline]
    #[must_use]
    pub fn for_region(is_african: bool) -> Self {
        if is_african {
            Self::Paystack
        } else {
            Self::Stripe
        }
    }

    /// Lowercase wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Paystack => "paystack",
        }
    }
}

impl fmt::Display for PaymentGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_selects_gateway() {
        assert_eq!(PaymentGateway::for_region(true), PaymentGateway::Paystack);
        assert_eq!(PaymentGateway::for_region(false), PaymentGateway::Stripe);
    }

    #[test]
    fn serde_roundtrip_name() {
        let json = serde_json::to_string(&PaymentGateway::Paystack).unwrap();
        assert_eq!(json, "\"paystack\"");
    }
}
