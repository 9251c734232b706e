//! Storage keys owned by chat persistence

/// Conversation list
pub const CONVERSATIONS: &str = "thinqscribe-conversations";
/// Conversation open in the chat view
pub const CURRENT_CONVERSATION: &str = "thinqscribe-current-conversation";
/// Generation settings
pub const MODEL_SETTINGS: &str = "thinqscribe-model-settings";
/// Selected model name
pub const SELECTED_MODEL: &str = "thinqscribe-selected-model";
/// Time of the last successful save
pub const LAST_SAVE: &str = "thinqscribe-last-save";
/// Persisted data overrides server data on next load
pub const FORCE_RESTORE: &str = "thinqscribe-force-restore";

/// Every key removed by a full clear
pub const ALL: [&str; 6] = [
    CONVERSATIONS,
    CURRENT_CONVERSATION,
    MODEL_SETTINGS,
    SELECTED_MODEL,
    LAST_SAVE,
    FORCE_RESTORE,
];
