//! Normalized location record

use crate::normalize::NGN_EXCHANGE_RATE;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thinq_payments::PaymentGateway;

/// ISO 3166-1 alpha-2 codes of African countries, lowercase
const AFRICAN_COUNTRIES: [&str; 54] = [
    "dz", "ao", "bj", "bw", "bf", "bi", "cv", "cm", "cf", "td", "km", "cg", "cd", "ci", "dj",
    "eg", "gq", "er", "sz", "et", "ga", "gm", "gh", "gn", "gw", "ke", "ls", "lr", "ly", "mg",
    "mw", "ml", "mr", "mu", "ma", "mz", "na", "ne", "ng", "rw", "st", "sn", "sc", "sl", "so",
    "za", "ss", "sd", "tz", "tg", "tn", "ug", "zm", "zw",
];

const UNKNOWN_FLAG: &str = "🌍";

/// Location and pricing recommendation shown to a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Country display name
    pub country: String,
    /// Lowercase ISO 3166-1 alpha-2 code
    pub country_code: String,
    /// City display name
    pub city: String,
    /// Lowercase ISO 4217 code
    pub currency: String,
    /// Currency symbol
    pub symbol: String,
    /// Units of `currency` per US dollar
    pub exchange_rate: f64,
    /// Flag emoji
    pub flag: String,
    /// Whether the country is in Africa
    pub is_african: bool,
    /// Gateway to offer at checkout
    pub recommended_gateway: PaymentGateway,
    /// When this record was written to the cache
    pub timestamp: DateTime<Utc>,
}

impl LocationRecord {
    /// Record used whenever detection fails
    #[must_use]
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            country: "Nigeria".to_string(),
            country_code: "ng".to_string(),
            city: "Lagos".to_string(),
            currency: "ngn".to_string(),
            symbol: "₦".to_string(),
            exchange_rate: NGN_EXCHANGE_RATE,
            flag: flag_for("ng"),
            is_african: true,
            recommended_gateway: PaymentGateway::Paystack,
            timestamp: now,
        }
    }

    /// Age of the record at `now`; records stamped in the future have age zero
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the record is still inside its validity window
    #[must_use]
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) < ttl
    }

    /// Time left before the record goes stale
    #[must_use]
    pub fn remaining(&self, ttl: Duration, now: DateTime<Utc>) -> Duration {
        ttl.saturating_sub(self.age(now))
    }

    /// Expiry instant for a validity window
    #[must_use]
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        ChronoDuration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.timestamp.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Convert a USD amount into the local currency
    #[inline]
    #[must_use]
    pub fn convert_from_usd(&self, amount_usd: f64) -> f64 {
        amount_usd * self.exchange_rate
    }

    /// Convert a USD amount and render it with the local symbol, e.g. `₦15,000.00`
    #[must_use]
    pub fn format_amount(&self, amount_usd: f64) -> String {
        let local = self.convert_from_usd(amount_usd);
        let sign = if local < 0.0 { "-" } else { "" };
        format!("{sign}{}{}", self.symbol, group_thousands(local.abs()))
    }
}

/// Whether a lowercase country code is African
#[must_use]
pub fn is_african_country(country_code: &str) -> bool {
    AFRICAN_COUNTRIES.contains(&country_code)
}

/// Regional-indicator flag for a two-letter country code
#[must_use]
pub fn flag_for(country_code: &str) -> String {
    let code = country_code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return UNKNOWN_FLAG.to_string();
    }

    code.to_ascii_uppercase()
        .chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

/// `1234567.891` → `1,234,567.89`
fn group_thousands(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn fallback_is_lagos_ngn() {
        let record = LocationRecord::fallback(at(0, 0));
        assert_eq!(record.country_code, "ng");
        assert_eq!(record.city, "Lagos");
        assert_eq!(record.currency, "ngn");
        assert_eq!(record.symbol, "₦");
        assert_eq!(record.flag, "🇳🇬");
        assert_eq!(record.recommended_gateway, PaymentGateway::Paystack);
    }

    #[test]
    fn freshness_window() {
        let record = LocationRecord::fallback(at(10, 0));
        let ttl = Duration::from_secs(2 * 60 * 60);

        assert!(record.is_fresh(ttl, at(11, 59)));
        assert!(!record.is_fresh(ttl, at(12, 0)));
        assert_eq!(record.remaining(ttl, at(11, 0)), Duration::from_secs(3600));
        assert_eq!(record.remaining(ttl, at(13, 0)), Duration::ZERO);
        assert_eq!(record.expires_at(ttl), at(12, 0));
    }

    #[test]
    fn future_timestamp_has_zero_age() {
        let record = LocationRecord::fallback(at(12, 0));
        assert_eq!(record.age(at(11, 0)), Duration::ZERO);
    }

    #[test]
    fn flags() {
        assert_eq!(flag_for("gh"), "🇬🇭");
        assert_eq!(flag_for("US"), "🇺🇸");
        assert_eq!(flag_for(""), UNKNOWN_FLAG);
        assert_eq!(flag_for("usa"), UNKNOWN_FLAG);
        assert_eq!(flag_for("1a"), UNKNOWN_FLAG);
    }

    #[test]
    fn african_lookup() {
        assert!(is_african_country("ke"));
        assert!(is_african_country("za"));
        assert!(!is_african_country("gb"));
    }

    #[test]
    fn formats_grouped_amounts() {
        let record = LocationRecord::fallback(at(0, 0));
        assert_eq!(record.format_amount(10.0), "₦15,000.00");
        assert_eq!(record.format_amount(0.5), "₦750.00");
        assert_eq!(record.format_amount(1000.0), "₦1,500,000.00");
        assert_eq!(record.format_amount(-2.0), "-₦3,000.00");
    }

    #[test]
    fn persisted_form_is_camel_case() {
        let record = LocationRecord::fallback(at(0, 0));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["countryCode"], "ng");
        assert_eq!(json["recommendedGateway"], "paystack");
        assert_eq!(json["isAfrican"], true);
    }
}
