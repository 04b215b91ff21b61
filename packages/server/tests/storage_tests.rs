//! Persistence round-trips for the API key and history files.

use std::path::PathBuf;

use server_core::domains::scanning::{HistoryEntry, LetterId, RecordStatus, MAX_HISTORY};
use server_core::kernel::FileStore;

fn temp_store(name: &str) -> FileStore {
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "mailscan-storage-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    FileStore::open(dir).unwrap()
}

fn entry(n: usize) -> HistoryEntry {
    HistoryEntry::now(
        LetterId::extract(&format!("ltr!id{n}")).unwrap(),
        RecordStatus::Success,
        "Marked as mailed",
    )
}

#[test]
fn api_key_round_trip() {
    let store = temp_store("key");
    assert_eq!(store.load_api_key(), None);

    store.save_api_key("th_api_live_abc123");
    assert_eq!(store.load_api_key().as_deref(), Some("th_api_live_abc123"));

    // Overwritten on re-entry, never appended.
    store.save_api_key("th_api_live_next");
    assert_eq!(store.load_api_key().as_deref(), Some("th_api_live_next"));
}

#[test]
fn history_round_trip_preserves_order() {
    let store = temp_store("order");
    let history: Vec<_> = (0..5).map(entry).collect();

    store.save_history(&history);
    let loaded = store.load_history();

    assert_eq!(loaded.len(), 5);
    for (original, reloaded) in history.iter().zip(&loaded) {
        assert_eq!(original.id, reloaded.id);
        assert_eq!(original.message, reloaded.message);
    }
}

#[test]
fn save_caps_history_dropping_oldest_first() {
    let store = temp_store("cap");
    let history: Vec<_> = (0..MAX_HISTORY + 50).map(entry).collect();

    store.save_history(&history);
    let loaded = store.load_history();

    assert_eq!(loaded.len(), MAX_HISTORY);
    // The 50 oldest entries are gone; the newest survives.
    assert_eq!(loaded[0].id, LetterId::extract("ltr!id50").unwrap());
    assert_eq!(
        loaded[MAX_HISTORY - 1].id,
        LetterId::extract(&format!("ltr!id{}", MAX_HISTORY + 49)).unwrap()
    );
}

#[test]
fn corrupt_history_file_loads_empty() {
    let store = temp_store("corrupt");
    store.save_history(&[entry(1)]);

    let dir: PathBuf = std::env::temp_dir().join(format!(
        "mailscan-storage-corrupt-{}",
        std::process::id()
    ));
    std::fs::write(dir.join("history.json"), "not json at all").unwrap();

    assert!(store.load_history().is_empty());
}

#[test]
fn clear_history_removes_the_file() {
    let store = temp_store("clear");
    store.save_history(&[entry(1), entry(2)]);
    assert_eq!(store.load_history().len(), 2);

    store.clear_history();
    assert!(store.load_history().is_empty());
}

#[test]
fn session_restores_from_persisted_history() {
    let store = temp_store("session");
    store.save_history(&[entry(7)]);
    store.save_api_key("th_api_live_restore");

    let session = server_core::domains::scanning::SessionStore::load(store);
    tokio_test::block_on(async {
        assert_eq!(session.api_key().await, "th_api_live_restore");
        assert!(session.is_known(&LetterId::extract("ltr!id7").unwrap()).await);
        assert_eq!(session.snapshot().await.history.len(), 1);
    });
}
