//! Unit tests for the history store over file-backed storage.

use std::cell::Cell;
use std::fs;
use std::io;
use std::rc::Rc;

use minibrowser::managers::history_store::{HistoryStore, HistoryStoreTrait};
use minibrowser::storage::{FileStorage, MemoryStorage, RecordStorage};
use minibrowser::types::errors::StorageError;
use minibrowser::types::settings::StorageSettings;
use tempfile::TempDir;

/// Creates a store over a fresh temporary directory.
fn setup() -> (TempDir, HistoryStore) {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    (dir, HistoryStore::new(Box::new(storage)))
}

/// Opens a second store over the same directory, as after a restart.
fn reopen(dir: &TempDir) -> HistoryStore {
    let mut store = HistoryStore::new(Box::new(FileStorage::open(dir.path()).unwrap()));
    store.load().unwrap();
    store
}

fn read_record(dir: &TempDir, record: &str) -> Vec<String> {
    let raw = fs::read_to_string(dir.path().join(record)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_missing_records_load_empty() {
    let (_dir, mut store) = setup();
    store.load().unwrap();
    assert!(store.visits().is_empty());
    assert!(store.downloads().is_empty());
}

#[test]
fn test_empty_record_loads_empty() {
    let (dir, mut store) = setup();
    fs::write(dir.path().join("history.json"), "  \n").unwrap();
    store.load().unwrap();
    assert!(store.visits().is_empty());
}

#[test]
fn test_visits_persist_as_json_array() {
    let (dir, mut store) = setup();
    store.record_visit("https://a.org/").unwrap();
    store.record_visit("https://b.org/").unwrap();

    assert_eq!(
        read_record(&dir, "history.json"),
        vec!["https://a.org/", "https://b.org/"]
    );
    assert_eq!(reopen(&dir).visits(), store.visits());
}

#[test]
fn test_repeated_visit_is_recorded_once() {
    let (_dir, mut store) = setup();
    assert!(store.record_visit("https://a.org/").unwrap());
    assert!(!store.record_visit("https://a.org/").unwrap());
    assert!(store.record_visit("https://b.org/").unwrap());
    assert!(store.record_visit("https://a.org/").unwrap());
    assert_eq!(
        store.visits(),
        ["https://a.org/", "https://b.org/", "https://a.org/"]
    );
}

#[test]
fn test_inline_documents_are_never_recorded() {
    let (_dir, mut store) = setup();
    assert!(!store
        .record_visit("data:text/html;charset=utf-8;base64,PGgxPkhpPC9oMT4=")
        .unwrap());
    assert!(!store.record_visit("DATA:text/plain,hello").unwrap());
    assert!(store.visits().is_empty());
}

#[test]
fn test_download_is_flushed_immediately() {
    let (dir, mut store) = setup();
    store.record_download("/home/me/report.pdf").unwrap();
    store.record_download("/home/me/report.pdf").unwrap();
    assert_eq!(
        read_record(&dir, "downloads.json"),
        vec!["/home/me/report.pdf", "/home/me/report.pdf"]
    );
}

#[test]
fn test_remove_visit_removes_first_occurrence() {
    let (dir, mut store) = setup();
    for url in ["https://a.org/", "https://b.org/", "https://a.org/"] {
        store.record_visit(url).unwrap();
    }
    assert!(store.remove_visit("https://a.org/").unwrap());
    assert_eq!(store.visits(), ["https://b.org/", "https://a.org/"]);
    assert!(!store.remove_visit("https://c.org/").unwrap());
    assert_eq!(reopen(&dir).visits(), store.visits());
}

#[test]
fn test_remove_by_index() {
    let (dir, mut store) = setup();
    store.record_download("/a").unwrap();
    store.record_download("/b").unwrap();
    assert_eq!(store.remove_download_at(0).unwrap().as_deref(), Some("/a"));
    assert_eq!(store.remove_download_at(5).unwrap(), None);
    assert_eq!(read_record(&dir, "downloads.json"), vec!["/b"]);
}

#[test]
fn test_clear_is_persisted() {
    let (dir, mut store) = setup();
    store.record_visit("https://a.org/").unwrap();
    store.record_download("/a").unwrap();
    store.clear_visits().unwrap();
    store.clear_downloads().unwrap();

    let reopened = reopen(&dir);
    assert!(reopened.visits().is_empty());
    assert!(reopened.downloads().is_empty());
}

#[test]
fn test_load_replaces_in_memory_state() {
    let (dir, mut store) = setup();
    fs::write(dir.path().join("history.json"), r#"["https://x.org/"]"#).unwrap();
    store.load().unwrap();
    assert_eq!(store.visits(), ["https://x.org/"]);
}

#[test]
fn test_malformed_record_is_an_error() {
    let (dir, mut store) = setup();
    fs::write(dir.path().join("downloads.json"), r#"{"not": "a list"}"#).unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(err, StorageError::Malformed { ref record, .. } if record == "downloads.json"));
}

#[test]
fn test_unreadable_record_propagates() {
    let (dir, mut store) = setup();
    fs::create_dir(dir.path().join("history.json")).unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(err, StorageError::Read { .. }));
}

#[test]
fn test_failed_write_propagates() {
    let (dir, mut store) = setup();
    fs::create_dir(dir.path().join("history.json")).unwrap();
    fs::write(dir.path().join("history.json").join("keep"), "x").unwrap();
    let err = store.record_visit("https://a.org/").unwrap_err();
    assert!(matches!(err, StorageError::Write { .. }));
}

/// Memory storage whose writes fail while `failing` is set.
struct FlakyStorage {
    inner: MemoryStorage,
    failing: Rc<Cell<bool>>,
}

impl RecordStorage for FlakyStorage {
    fn read(&self, record: &str) -> Result<Option<String>, StorageError> {
        self.inner.read(record)
    }

    fn write(&self, record: &str, contents: &str) -> Result<(), StorageError> {
        if self.failing.get() {
            return Err(StorageError::Write {
                record: record.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.write(record, contents)
    }
}

fn flaky_store() -> (MemoryStorage, Rc<Cell<bool>>, HistoryStore) {
    let inner = MemoryStorage::new();
    let failing = Rc::new(Cell::new(false));
    let storage = FlakyStorage {
        inner: inner.clone(),
        failing: Rc::clone(&failing),
    };
    (inner, failing, HistoryStore::new(Box::new(storage)))
}

#[test]
fn test_failed_visit_write_leaves_log_unchanged() {
    let (inner, failing, mut store) = flaky_store();
    failing.set(true);
    assert!(store.record_visit("https://a.org/").is_err());
    assert!(store.visits().is_empty());

    failing.set(false);
    assert!(store.record_visit("https://a.org/").unwrap());
    let mut restarted = HistoryStore::new(Box::new(inner));
    restarted.load().unwrap();
    assert_eq!(restarted.visits(), ["https://a.org/"]);
}

#[test]
fn test_failed_download_write_leaves_log_unchanged() {
    let (_inner, failing, mut store) = flaky_store();
    store.record_download("/tmp/a.pdf").unwrap();
    failing.set(true);
    assert!(store.record_download("/tmp/b.pdf").is_err());
    assert_eq!(store.downloads(), ["/tmp/a.pdf"]);
}

#[test]
fn test_failed_removal_restores_entry_in_place() {
    let (_inner, failing, mut store) = flaky_store();
    for url in ["https://a.org/", "https://b.org/", "https://c.org/"] {
        store.record_visit(url).unwrap();
    }
    store.record_download("/tmp/a.pdf").unwrap();
    store.record_download("/tmp/b.pdf").unwrap();
    failing.set(true);

    assert!(store.remove_visit_at(1).is_err());
    assert!(store.remove_visit("https://c.org/").is_err());
    assert!(store.remove_download_at(0).is_err());
    assert!(store.remove_download("/tmp/b.pdf").is_err());
    assert_eq!(store.visits(), ["https://a.org/", "https://b.org/", "https://c.org/"]);
    assert_eq!(store.downloads(), ["/tmp/a.pdf", "/tmp/b.pdf"]);
}

#[test]
fn test_failed_clear_restores_logs() {
    let (_inner, failing, mut store) = flaky_store();
    store.record_visit("https://a.org/").unwrap();
    store.record_download("/tmp/a.pdf").unwrap();
    failing.set(true);

    assert!(store.clear_visits().is_err());
    assert!(store.clear_downloads().is_err());
    assert_eq!(store.visits(), ["https://a.org/"]);
    assert_eq!(store.downloads(), ["/tmp/a.pdf"]);
}

#[test]
fn test_custom_record_names() {
    let dir = tempfile::tempdir().unwrap();
    let settings = StorageSettings {
        history_file: "visits.log".to_string(),
        downloads_file: "files.log".to_string(),
        ..StorageSettings::default()
    };
    let storage = FileStorage::open(dir.path()).unwrap();
    let mut store = HistoryStore::with_settings(Box::new(storage), &settings);
    store.record_visit("https://a.org/").unwrap();
    store.save().unwrap();
    assert!(dir.path().join("visits.log").exists());
    assert!(dir.path().join("files.log").exists());
}
