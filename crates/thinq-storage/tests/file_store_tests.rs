use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thinq_storage::{FileStore, KeyValueStore, KeyValueStoreExt, SharedStore, StorageError};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Settings {
    temperature: f32,
    max_tokens: u32,
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileStore::open(dir.path()).unwrap();
        store
            .set_json(
                "thinqscribe-model-settings",
                &Settings {
                    temperature: 0.5,
                    max_tokens: 1024,
                },
            )
            .unwrap();
    }

    let reopened = FileStore::open(dir.path()).unwrap();
    let settings: Settings = reopened
        .get_json("thinqscribe-model-settings")
        .unwrap()
        .expect("settings should persist");

    assert_eq!(
        settings,
        Settings {
            temperature: 0.5,
            max_tokens: 1024
        }
    );
}

#[test]
fn invalid_keys_are_rejected_on_every_operation() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    assert!(matches!(store.get("a/b"), Err(StorageError::InvalidKey(_))));
    assert!(matches!(store.set("a/b", "v"), Err(StorageError::InvalidKey(_))));
    assert!(matches!(store.remove("a/b"), Err(StorageError::InvalidKey(_))));
}

#[test]
fn corrupt_file_surfaces_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("thinqscribe-conversations.json"), "[{").unwrap();

    let store: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
    let err = store
        .get_json::<Vec<Settings>>("thinqscribe-conversations")
        .unwrap_err();

    assert!(err.is_corrupt());
}

#[test]
fn concurrent_writers_of_one_key_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).unwrap());

    for round in 0..50 {
        let writers: Vec<_> = ["\"first\"", "\"second\""]
            .into_iter()
            .map(|value| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.set("thinqscribe-current-conversation", value))
            })
            .collect();

        for writer in writers {
            assert!(writer.join().unwrap().is_ok(), "write failed in round {round}");
        }

        let stored = store.get("thinqscribe-current-conversation").unwrap();
        assert!(matches!(
            stored.as_deref(),
            Some("\"first\"") | Some("\"second\"")
        ));
    }

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["thinqscribe-current-conversation.json".to_string()]);
}
