//! Raw geolocation response → [`LocationRecord`]
//!
//! The endpoint is trusted for shape only loosely: every field is optional
//! and missing values fall back to neutral defaults. Nigerian users are
//! detected through several signals because IP geolocation often places
//! Lagos traffic in the wrong country.

use crate::record::{flag_for, is_african_country, LocationRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thinq_payments::PaymentGateway;

/// Naira per US dollar used for all Nigerian pricing
pub const NGN_EXCHANGE_RATE: f64 = 1500.0;

const LAGOS_TIMEZONE: &str = "Africa/Lagos";
const DEFAULT_CURRENCY: &str = "usd";

/// Geolocation response body, camelCase with snake_case aliases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    /// Country name, or a bare code on some providers
    #[serde(default)]
    pub country: Option<String>,
    /// Country name when `country` holds the code
    #[serde(default, alias = "country_name")]
    pub country_name: Option<String>,
    /// ISO country code, any case
    #[serde(default, alias = "country_code")]
    pub country_code: Option<String>,
    /// City name
    #[serde(default)]
    pub city: Option<String>,
    /// ISO currency code, any case
    #[serde(default)]
    pub currency: Option<String>,
    /// Currency symbol
    #[serde(default)]
    pub symbol: Option<String>,
    /// Units of currency per US dollar
    #[serde(default, alias = "exchange_rate")]
    pub exchange_rate: Option<f64>,
    /// IANA timezone of the client address
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Build a cache record from a raw response
///
/// Currency is forced to NGN when any of these hold:
/// - country code is `ng`
/// - city contains `lagos` (any case)
/// - response or client timezone contains `Africa/Lagos`
#[must_use]
pub fn normalize(
    raw: &RawLocation,
    client_timezone: Option<&str>,
    now: DateTime<Utc>,
) -> LocationRecord {
    let country_code = non_empty(raw.country_code.as_deref())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let city = non_empty(raw.city.as_deref()).unwrap_or("Unknown").to_string();
    let country = non_empty(raw.country_name.as_deref())
        .or_else(|| non_empty(raw.country.as_deref()))
        .unwrap_or("Unknown")
        .to_string();

    let nigerian = country_code == "ng"
        || city.to_lowercase().contains("lagos")
        || [raw.timezone.as_deref(), client_timezone]
            .into_iter()
            .flatten()
            .any(|tz| tz.contains(LAGOS_TIMEZONE));

    let is_african = nigerian || is_african_country(&country_code);

    let (currency, symbol, exchange_rate) = if nigerian {
        ("ngn".to_string(), "₦".to_string(), NGN_EXCHANGE_RATE)
    } else {
        let currency = non_empty(raw.currency.as_deref())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let symbol = non_empty(raw.symbol.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| symbol_for(&currency));
        let exchange_rate = raw
            .exchange_rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .unwrap_or(1.0);
        (currency, symbol, exchange_rate)
    };

    LocationRecord {
        flag: flag_for(&country_code),
        country,
        country_code,
        city,
        currency,
        symbol,
        exchange_rate,
        is_african,
        recommended_gateway: PaymentGateway::for_region(is_african),
        timestamp: now,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Symbol for common checkout currencies, the uppercase code otherwise
fn symbol_for(currency: &str) -> String {
    let symbol = match currency {
        "usd" | "cad" | "aud" => "$",
        "ngn" => "₦",
        "gbp" => "£",
        "eur" => "€",
        "ghs" => "₵",
        "kes" => "KSh",
        "zar" => "R",
        "inr" => "₹",
        _ => return currency.to_ascii_uppercase(),
    };
    symbol.to_string()
}
