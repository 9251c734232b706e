use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;
use thinq_chat::ChatPersistence;
use thinq_cli::{App, AppConfig, RestoreFlagAction};
use thinq_location::LocationConfig;
use thinq_storage::{FileStore, SharedStore};
use thinq_test_utils::{
    failed_payment, lagos_raw, london_raw, memory_store, nairobi_raw, sample_conversation,
    sample_conversations, settled_payment, StubGeoProvider,
};

fn location_config() -> LocationConfig {
    LocationConfig::new().with_client_timezone(None)
}

#[tokio::test]
async fn location_reports_network_then_memory() {
    let provider = StubGeoProvider::returning(london_raw());
    let app = App::new(provider.clone(), memory_store(), location_config());

    let first = app.show_location(false).await;
    let second = app.show_location(false).await;

    assert!(first.contains("London, United Kingdom"));
    assert!(first.contains("Source: network"));
    assert!(first.contains("valid until"));
    assert!(first.contains("Gateway: stripe"));
    assert!(second.contains("Source: memory"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn lagos_prices_in_naira() {
    let provider = StubGeoProvider::returning(lagos_raw());
    let app = App::new(provider, memory_store(), location_config());

    let text = app.show_location(false).await;

    assert!(text.contains("Currency: NGN (₦)"));
    assert!(text.contains("$10.00 = ₦15,000.00"));
    assert!(text.contains("Gateway: paystack"));
}

#[tokio::test]
async fn refresh_goes_back_to_the_network() {
    let provider = StubGeoProvider::returning(london_raw());
    let app = App::new(provider.clone(), memory_store(), location_config());
    app.show_location(false).await;

    provider.respond_with(nairobi_raw());
    let text = app.show_location(true).await;

    assert!(text.contains("Nairobi, Kenya"));
    assert!(text.contains("KSh"));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn failing_provider_shows_fallback() {
    let provider = StubGeoProvider::failing(502);
    let app = App::new(provider.clone(), memory_store(), location_config());

    let text = app.show_location(false).await;
    app.show_location(false).await;

    assert!(text.contains("Lagos, Nigeria"));
    assert!(text.contains("Source: fallback"));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn location_survives_restart_via_file_store() {
    let dir = TempDir::new().unwrap();
    let open = || -> SharedStore { Arc::new(FileStore::open(dir.path()).unwrap()) };

    let provider = StubGeoProvider::returning(london_raw());
    App::new(provider.clone(), open(), location_config())
        .show_location(false)
        .await;

    let restarted = App::new(provider.clone(), open(), location_config());
    let text = restarted.show_location(false).await;

    assert!(text.contains("Source: stored"));
    assert_eq!(provider.calls(), 1);

    restarted.clear_location().await;
    let after_clear = restarted.show_location(false).await;
    assert!(after_clear.contains("Source: network"));
    assert_eq!(provider.calls(), 2);
}

#[test]
fn chat_commands_over_shared_store() {
    let store = memory_store();
    let app = App::new(
        StubGeoProvider::returning(london_raw()),
        store.clone(),
        location_config(),
    );
    let seeded = ChatPersistence::new(store);

    assert_eq!(app.list_conversations(), "No saved conversations");
    assert_eq!(app.show_current().unwrap(), "No current conversation");

    seeded.save_conversations(&sample_conversations());
    seeded.save_current_conversation(&sample_conversation("c-proposal"));

    let listing = app.list_conversations();
    assert!(listing.contains("c-proposal  Research proposal  2 messages"));
    assert!(listing.contains("c-empty  Untitled  0 messages"));
    assert!(listing.contains("Last saved"));

    let shown = app.show_current().unwrap();
    assert!(shown.contains("\"id\": \"c-proposal\""));
    assert!(shown.contains("green roofs"));

    assert_eq!(app.clear_chat().unwrap(), "Chat data cleared");
    assert_eq!(app.list_conversations(), "No saved conversations");
}

#[test]
fn restore_flag_commands() {
    let app = App::new(
        StubGeoProvider::returning(london_raw()),
        memory_store(),
        location_config(),
    );

    assert_eq!(
        app.restore_flag(RestoreFlagAction::Check).unwrap(),
        "Force restore: off"
    );
    app.restore_flag(RestoreFlagAction::Set).unwrap();
    assert_eq!(
        app.restore_flag(RestoreFlagAction::Check).unwrap(),
        "Force restore: on"
    );
    app.restore_flag(RestoreFlagAction::Clear).unwrap();
    assert_eq!(
        app.restore_flag(RestoreFlagAction::Check).unwrap(),
        "Force restore: off"
    );
}

#[test]
fn payment_fixtures_through_the_command() {
    let settled = serde_json::to_string(&settled_payment()).unwrap();
    let failed = serde_json::to_string(&failed_payment()).unwrap();

    assert_eq!(thinq_cli::payment_status(&settled).unwrap(), "paid (Paid)");
    assert_eq!(thinq_cli::payment_status(&failed).unwrap(), "failed (Failed)");
}

#[test]
fn from_config_creates_data_dir() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("state");
    let config = AppConfig::new()
        .with_data_dir(&data_dir)
        .with_endpoint("http://127.0.0.1:9/geo");

    let app = App::from_config(&config).unwrap();

    assert!(data_dir.is_dir());
    assert_eq!(app.location.config().endpoint, "http://127.0.0.1:9/geo");
}
