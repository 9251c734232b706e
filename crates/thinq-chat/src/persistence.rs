//! Chat state persistence over a [`KeyValueStore`]
//!
//! Two API layers:
//! - `try_*` methods return [`PersistenceResult`] so callers can tell
//!   "absent" from "failed"
//! - the plain methods never fail: saves report `bool`, loads fall back to
//!   `None` or defaults, and the cause is logged

use crate::error::{PersistenceError, PersistenceResult};
use crate::keys;
use crate::types::{ChatMessage, Conversation, ModelSettings};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fmt;
use thinq_storage::{KeyValueStore, KeyValueStoreExt, SharedStore};
use tracing::{debug, warn};

const FLAG_SET: &str = "true";

/// Durable mirror of chat state
#[derive(Clone)]
pub struct ChatPersistence {
    store: SharedStore,
}

impl ChatPersistence {
    /// Create persistence over a store
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    // ----- saves -----

    /// Replace the persisted conversation list
    ///
    /// # Errors
    /// Serialization or storage failures.
    pub fn try_save_conversations(&self, conversations: &[Conversation]) -> PersistenceResult<()> {
        self.store.set_json(keys::CONVERSATIONS, conversations)?;
        self.touch_last_save();
        debug!("Saved {} conversations", conversations.len());
        Ok(())
    }

    /// Replace the persisted conversation list, reporting success
    pub fn save_conversations(&self, conversations: &[Conversation]) -> bool {
        report("save conversations", self.try_save_conversations(conversations))
    }

    /// Replace the persisted current conversation
    ///
    /// # Errors
    /// Serialization or storage failures.
    pub fn try_save_current_conversation(&self, conversation: &Conversation) -> PersistenceResult<()> {
        self.store.set_json(keys::CURRENT_CONVERSATION, conversation)?;
        self.touch_last_save();
        debug!("Saved current conversation {}", conversation.id);
        Ok(())
    }

    /// Replace the persisted current conversation, reporting success
    pub fn save_current_conversation(&self, conversation: &Conversation) -> bool {
        report(
            "save current conversation",
            self.try_save_current_conversation(conversation),
        )
    }

    /// Persist the selected model and its settings
    ///
    /// # Errors
    /// Serialization or storage failures. The model name is written first, so
    /// a failure on the settings write can leave a new model with old settings.
    pub fn try_save_model_settings(
        &self,
        model: &str,
        settings: &ModelSettings,
    ) -> PersistenceResult<()> {
        self.store.set_json(keys::SELECTED_MODEL, model)?;
        self.store.set_json(keys::MODEL_SETTINGS, settings)?;
        self.touch_last_save();
        debug!("Saved settings for model {}", model);
        Ok(())
    }

    /// Persist the selected model and its settings, reporting success
    pub fn save_model_settings(&self, model: &str, settings: &ModelSettings) -> bool {
        report(
            "save model settings",
            self.try_save_model_settings(model, settings),
        )
    }

    /// Append a message to a persisted conversation
    ///
    /// Updates the conversation list entry and, when the ids match, the
    /// current conversation. Each copy is handled on its own: an unreadable
    /// copy is skipped, and both writes are attempted before reporting. On
    /// `Err`, a copy whose write succeeded keeps the new message.
    ///
    /// # Errors
    /// - `PersistenceError::ConversationNotFound` if no readable copy holds the id
    /// - the first storage failure from a read or write
    pub fn try_append_message(
        &self,
        conversation_id: &str,
        message: ChatMessage,
    ) -> PersistenceResult<()> {
        let mut first_error: Option<PersistenceError> = None;
        let mut appended = false;

        let conversations = readable_or(
            "append to conversation list",
            self.try_load_conversations(),
            &mut first_error,
        );
        if let Some(mut conversations) = conversations {
            if let Some(conversation) = conversations.iter_mut().find(|c| c.id == conversation_id) {
                conversation.push(message.clone());
                match self.store.set_json(keys::CONVERSATIONS, &conversations) {
                    Ok(()) => appended = true,
                    Err(e) => {
                        first_error.get_or_insert(e.into());
                    }
                }
            }
        }

        let current = readable_or(
            "append to current conversation",
            self.try_load_current_conversation(),
            &mut first_error,
        )
        .flatten()
        .filter(|c| c.id == conversation_id);
        if let Some(mut conversation) = current {
            conversation.push(message);
            match self.store.set_json(keys::CURRENT_CONVERSATION, &conversation) {
                Ok(()) => appended = true,
                Err(e) => {
                    first_error.get_or_insert(e.into());
                }
            }
        }

        if appended {
            self.touch_last_save();
        }

        match first_error {
            Some(e) => Err(e),
            None if appended => Ok(()),
            None => Err(PersistenceError::ConversationNotFound(
                conversation_id.to_string(),
            )),
        }
    }

    /// Append a message to a persisted conversation, reporting success
    ///
    /// Returns `false` without creating anything when the id is unknown.
    pub fn append_message(&self, conversation_id: &str, message: ChatMessage) -> bool {
        report(
            "append message",
            self.try_append_message(conversation_id, message),
        )
    }

    // ----- loads -----

    /// Read the persisted conversation list; empty when absent
    ///
    /// # Errors
    /// Storage failures or unreadable data.
    pub fn try_load_conversations(&self) -> PersistenceResult<Vec<Conversation>> {
        Ok(self
            .store
            .get_json::<Vec<Conversation>>(keys::CONVERSATIONS)?
            .unwrap_or_default())
    }

    /// Read the persisted conversation list; empty on absence or failure
    #[must_use]
    pub fn load_conversations(&self) -> Vec<Conversation> {
        recover("load conversations", self.try_load_conversations()).unwrap_or_default()
    }

    /// Read the persisted current conversation
    ///
    /// # Errors
    /// Storage failures or unreadable data.
    pub fn try_load_current_conversation(&self) -> PersistenceResult<Option<Conversation>> {
        self.load_key(keys::CURRENT_CONVERSATION)
    }

    /// Read the persisted current conversation; `None` on absence or failure
    #[must_use]
    pub fn load_current_conversation(&self) -> Option<Conversation> {
        recover(
            "load current conversation",
            self.try_load_current_conversation(),
        )
        .flatten()
    }

    /// Read the selected model and its settings
    ///
    /// Settings default when absent.
    ///
    /// # Errors
    /// Storage failures or unreadable data.
    pub fn try_load_model_settings(&self) -> PersistenceResult<(Option<String>, ModelSettings)> {
        let model = self.load_key::<String>(keys::SELECTED_MODEL)?;
        let settings = self
            .load_key::<ModelSettings>(keys::MODEL_SETTINGS)?
            .unwrap_or_default();
        Ok((model, settings))
    }

    /// Read the selected model and its settings
    ///
    /// Each half falls back on its own, so a corrupt settings value does not
    /// hide a readable model name.
    #[must_use]
    pub fn load_model_settings(&self) -> (Option<String>, ModelSettings) {
        let model = recover(
            "load selected model",
            self.load_key::<String>(keys::SELECTED_MODEL),
        )
        .flatten();
        let settings = recover(
            "load model settings",
            self.load_key::<ModelSettings>(keys::MODEL_SETTINGS),
        )
        .flatten()
        .unwrap_or_default();
        (model, settings)
    }

    /// Time of the last successful save
    #[must_use]
    pub fn last_save(&self) -> Option<DateTime<Utc>> {
        recover("load last save", self.load_key::<DateTime<Utc>>(keys::LAST_SAVE)).flatten()
    }

    // ----- clearing and restore flag -----

    /// Remove every chat key
    ///
    /// Attempts all keys even after a failure.
    ///
    /// # Errors
    /// The first storage failure encountered.
    pub fn try_clear_chat_data(&self) -> PersistenceResult<()> {
        let mut first_error = None;
        for key in keys::ALL {
            if let Err(e) = self.store.remove(key) {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => {
                debug!("Cleared chat data");
                Ok(())
            }
        }
    }

    /// Remove every chat key, reporting success
    pub fn clear_chat_data(&self) -> bool {
        report("clear chat data", self.try_clear_chat_data())
    }

    /// Mark persisted data as authoritative for the next load
    pub fn set_force_restore(&self) -> bool {
        report(
            "set force-restore flag",
            self.store
                .set(keys::FORCE_RESTORE, FLAG_SET)
                .map_err(PersistenceError::from),
        )
    }

    /// Whether the force-restore flag is set; `false` when unreadable
    #[must_use]
    pub fn should_force_restore(&self) -> bool {
        match self.store.get(keys::FORCE_RESTORE) {
            Ok(value) => value.as_deref() == Some(FLAG_SET),
            Err(e) => {
                warn!("Failed to read force-restore flag: {}", e);
                false
            }
        }
    }

    /// Clear the force-restore flag
    pub fn clear_force_restore(&self) -> bool {
        report(
            "clear force-restore flag",
            self.store
                .remove(keys::FORCE_RESTORE)
                .map_err(PersistenceError::from),
        )
    }

    fn load_key<T: DeserializeOwned>(&self, key: &str) -> PersistenceResult<Option<T>> {
        Ok(self.store.get_json(key)?)
    }

    fn touch_last_save(&self) {
        if let Err(e) = self.store.set_json(keys::LAST_SAVE, &Utc::now()) {
            debug!("Failed to record last save time: {}", e);
        }
    }
}

impl fmt::Debug for ChatPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatPersistence")
            .field("store", &self.store)
            .finish()
    }
}

fn report(operation: &str, result: PersistenceResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to {}: {}", operation, e);
            false
        }
    }
}

/// Value of a read; corrupt data is skipped, other failures are kept
fn readable_or<T>(
    operation: &str,
    result: PersistenceResult<T>,
    first_error: &mut Option<PersistenceError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_corrupt() => {
            warn!("Skipping unreadable data ({}): {}", operation, e);
            None
        }
        Err(e) => {
            first_error.get_or_insert(e);
            None
        }
    }
}

fn recover<T>(operation: &str, result: PersistenceResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_corrupt() => {
            warn!("Ignoring unreadable data ({}): {}", operation, e);
            None
        }
        Err(e) => {
            warn!("Failed to {}: {}", operation, e);
            None
        }
    }
}
