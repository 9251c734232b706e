//! Command handlers
//!
//! Handlers return the text to print so they can be driven from tests
//! without a terminal.

use crate::config::AppConfig;
use anyhow::Context as _;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thinq_chat::ChatPersistence;
use thinq_location::{
    GeoProvider, HttpGeoProvider, LocationCache, LocationConfig, LocationRecord, LocationSource,
};
use thinq_payments::{normalize, PaymentRecord};
use thinq_storage::{FileStore, SharedStore};

/// Sample price shown next to a location, in USD
const SAMPLE_PRICE_USD: f64 = 10.0;

/// Force-restore flag operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreFlagAction {
    /// Set the flag
    Set,
    /// Report the flag
    Check,
    /// Clear the flag
    Clear,
}

impl RestoreFlagAction {
    /// Parse a command-line value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "set" => Some(Self::Set),
            "check" => Some(Self::Check),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

/// Services shared by every command
#[derive(Debug)]
pub struct App {
    /// Location cache
    pub location: LocationCache,
    /// Chat persistence
    pub chat: ChatPersistence,
}

impl App {
    /// Wire services over an explicit provider and store
    #[must_use]
    pub fn new(provider: Arc<dyn GeoProvider>, store: SharedStore, config: LocationConfig) -> Self {
        Self {
            location: LocationCache::new(provider, store.clone(), config),
            chat: ChatPersistence::new(store),
        }
    }

    /// Wire services from configuration: HTTP provider and file store
    ///
    /// # Errors
    /// If the data directory cannot be created or the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = FileStore::open(config.storage.data_dir.clone()).with_context(|| {
            format!(
                "failed to open data directory {}",
                config.storage.data_dir.display()
            )
        })?;
        let location_config = config.location_config();
        let provider = HttpGeoProvider::from_config(&location_config)?;

        tracing::debug!(
            "Using data dir {} and endpoint {}",
            config.storage.data_dir.display(),
            provider.endpoint()
        );

        Ok(Self::new(Arc::new(provider), Arc::new(store), location_config))
    }

    /// `location [--refresh]`
    pub async fn show_location(&self, refresh: bool) -> String {
        let ttl = self.location.config().ttl;
        match self.location.resolve(refresh).await {
            Ok(resolved) => {
                let expires = resolved.record.expires_at(ttl);
                describe_location(&resolved.record, source_label(resolved.source), Some(expires))
            }
            Err(e) => {
                tracing::warn!(
                    "Location lookup failed (retryable: {}), using fallback: {}",
                    e.is_retryable(),
                    e
                );
                describe_location(&LocationRecord::fallback(Utc::now()), "fallback", None)
            }
        }
    }

    /// `location clear`
    pub async fn clear_location(&self) -> String {
        self.location.clear_cache().await;
        "Location cache cleared".to_string()
    }

    /// `chat list`
    #[must_use]
    pub fn list_conversations(&self) -> String {
        let conversations = self.chat.load_conversations();
        if conversations.is_empty() {
            return "No saved conversations".to_string();
        }

        let mut lines: Vec<String> = conversations
            .iter()
            .map(|conversation| {
                format!(
                    "{}  {}  {} messages  updated {}",
                    conversation.id,
                    conversation.title.as_deref().unwrap_or("(untitled)"),
                    conversation.messages.len(),
                    conversation.updated_at.format("%Y-%m-%d %H:%M UTC"),
                )
            })
            .collect();
        if let Some(saved) = self.chat.last_save() {
            lines.push(format!("Last saved {}", saved.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        lines.join("\n")
    }

    /// `chat show`: current conversation as pretty JSON
    ///
    /// # Errors
    /// If the conversation cannot be serialized.
    pub fn show_current(&self) -> anyhow::Result<String> {
        match self.chat.load_current_conversation() {
            Some(conversation) => Ok(serde_json::to_string_pretty(&conversation)?),
            None => Ok("No current conversation".to_string()),
        }
    }

    /// `chat clear`
    ///
    /// # Errors
    /// If any chat key could not be removed.
    pub fn clear_chat(&self) -> anyhow::Result<String> {
        self.chat
            .try_clear_chat_data()
            .context("failed to clear chat data")?;
        Ok("Chat data cleared".to_string())
    }

    /// `chat restore-flag <set|check|clear>`
    ///
    /// # Errors
    /// If the flag could not be written.
    pub fn restore_flag(&self, action: RestoreFlagAction) -> anyhow::Result<String> {
        match action {
            RestoreFlagAction::Set => {
                anyhow::ensure!(self.chat.set_force_restore(), "failed to set force-restore flag");
                Ok("Force-restore flag set".to_string())
            }
            RestoreFlagAction::Check => Ok(if self.chat.should_force_restore() {
                "Force restore: on".to_string()
            } else {
                "Force restore: off".to_string()
            }),
            RestoreFlagAction::Clear => {
                anyhow::ensure!(
                    self.chat.clear_force_restore(),
                    "failed to clear force-restore flag"
                );
                Ok("Force-restore flag cleared".to_string())
            }
        }
    }
}

/// `payment status <json>`: canonical status of a payment object
///
/// # Errors
/// If `json` is not a payment object.
pub fn payment_status(json: &str) -> anyhow::Result<String> {
    let record: PaymentRecord =
        serde_json::from_str(json).context("payment must be a JSON object")?;
    let status = normalize(&record);
    Ok(format!("{} ({})", status, status.label()))
}

fn source_label(source: LocationSource) -> &'static str {
    match source {
        LocationSource::Memory => "memory",
        LocationSource::Persisted => "stored",
        LocationSource::Network => "network",
    }
}

fn describe_location(
    record: &LocationRecord,
    source: &str,
    expires: Option<DateTime<Utc>>,
) -> String {
    let validity = match expires {
        Some(at) => format!("valid until {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => "not cached".to_string(),
    };

    [
        format!("{} {}, {}", record.flag, record.city, record.country),
        format!(
            "Currency: {} ({}), rate {} per USD",
            record.currency.to_uppercase(),
            record.symbol,
            record.exchange_rate
        ),
        format!(
            "${:.2} = {}",
            SAMPLE_PRICE_USD,
            record.format_amount(SAMPLE_PRICE_USD)
        ),
        format!("Gateway: {}", record.recommended_gateway),
        format!(
            "Source: {}, recorded {}, {}",
            source,
            record.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            validity
        ),
    ]
    .join("\n")
}
