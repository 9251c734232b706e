//! Testing utilities for the ThinqScribe workspace
//!
//! Shared test helpers and fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thinq_chat::{ChatMessage, Conversation};
use thinq_location::{GeoProvider, LocationError, RawLocation};
use thinq_payments::PaymentRecord;
use thinq_storage::MemoryStore;

/// Provider answering every call with the same scripted outcome
#[derive(Debug)]
pub struct StubGeoProvider {
    response: Mutex<Result<RawLocation, u16>>,
    calls: AtomicUsize,
}

impl StubGeoProvider {
    pub fn returning(raw: RawLocation) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Ok(raw)),
            calls: AtomicUsize::new(0),
        })
    }

    /// Every call fails with an HTTP status error
    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Err(status)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn respond_with(&self, raw: RawLocation) {
        *self.response.lock() = Ok(raw);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoProvider for StubGeoProvider {
    async fn fetch(&self) -> Result<RawLocation, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .clone()
            .map_err(LocationError::Status)
    }
}

pub fn lagos_raw() -> RawLocation {
    RawLocation {
        country: Some("Nigeria".to_string()),
        country_code: Some("NG".to_string()),
        city: Some("Lagos".to_string()),
        currency: Some("NGN".to_string()),
        timezone: Some("Africa/Lagos".to_string()),
        ..RawLocation::default()
    }
}

pub fn london_raw() -> RawLocation {
    RawLocation {
        country: Some("United Kingdom".to_string()),
        country_code: Some("GB".to_string()),
        city: Some("London".to_string()),
        currency: Some("GBP".to_string()),
        symbol: Some("£".to_string()),
        exchange_rate: Some(0.79),
        timezone: Some("Europe/London".to_string()),
        ..RawLocation::default()
    }
}

pub fn nairobi_raw() -> RawLocation {
    RawLocation {
        country: Some("Kenya".to_string()),
        country_code: Some("KE".to_string()),
        city: Some("Nairobi".to_string()),
        currency: Some("KES".to_string()),
        symbol: Some("KSh".to_string()),
        exchange_rate: Some(129.5),
        timezone: Some("Africa/Nairobi".to_string()),
        ..RawLocation::default()
    }
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn sample_conversation(id: &str) -> Conversation {
    let mut conversation = Conversation::with_id(id).titled("Research proposal");
    conversation.push(ChatMessage::user("Suggest a research question on urban heat"));
    conversation.push(ChatMessage::assistant(
        "How do green roofs change surface temperature in Lagos?",
    ));
    conversation
}

pub fn sample_conversations() -> Vec<Conversation> {
    vec![
        sample_conversation("c-proposal"),
        Conversation::with_id("c-empty").titled("Untitled"),
    ]
}

pub fn settled_payment() -> PaymentRecord {
    PaymentRecord::with_status("pending").paid_at(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
}

pub fn failed_payment() -> PaymentRecord {
    PaymentRecord::with_status("failed")
}
