//! Payment view-model as received from the payment API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Payment date in whichever form the backend sent it
///
/// Only its presence drives the status; the value is kept for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentDate {
    /// RFC 3339 timestamp
    Timestamp(DateTime<Utc>),
    /// Milliseconds since the Unix epoch
    EpochMillis(f64),
    /// Any other date text, such as `2024-05-01`
    Text(String),
}

impl PaymentDate {
    /// Best-effort UTC instant; date-only text maps to midnight
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(at) => Some(*at),
            #[allow(clippy::cast_possible_truncation)]
            Self::EpochMillis(millis) => DateTime::from_timestamp_millis(*millis as i64),
            Self::Text(text) => {
                let text = text.trim();
                DateTime::parse_from_rfc3339(text)
                    .map(|at| at.with_timezone(&Utc))
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(text, "%Y-%m-%d")
                            .ok()
                            .and_then(|date| date.and_hms_opt(0, 0, 0))
                            .map(|at| at.and_utc())
                    })
            }
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl From<DateTime<Utc>> for PaymentDate {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Timestamp(at)
    }
}

/// Absent, `null`, and blank strings all mean "no payment date"
fn present_payment_date<'de, D>(deserializer: D) -> Result<Option<PaymentDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let date = Option::<PaymentDate>::deserialize(deserializer)?;
    Ok(date.filter(|date| !date.is_blank()))
}

/// Server payment object, read-only on the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Raw backend status, any casing or alias
    #[serde(default)]
    pub status: Option<String>,
    /// Settlement time, present once the payment cleared
    #[serde(default, deserialize_with = "present_payment_date")]
    pub payment_date: Option<PaymentDate>,
    /// Explicit paid marker
    #[serde(default)]
    pub is_paid: Option<bool>,
}

impl PaymentRecord {
    /// Record carrying only a raw status
    #[must_use]
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Set the payment date
    #[must_use]
    pub fn paid_at(mut self, date: DateTime<Utc>) -> Self {
        self.payment_date = Some(date.into());
        self
    }

    /// Set the explicit paid marker
    #[must_use]
    pub fn marked_paid(mut self, is_paid: bool) -> Self {
        self.is_paid = Some(is_paid);
        self
    }
}
