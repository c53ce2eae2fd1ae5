//! Unit tests for the history and download viewers.

use std::fs;

use minibrowser::managers::download_viewer::DownloadViewer;
use minibrowser::managers::history_store::{HistoryStore, HistoryStoreTrait};
use minibrowser::managers::history_viewer::HistoryViewer;
use minibrowser::storage::MemoryStorage;
use minibrowser::types::errors::ViewerError;
use tempfile::TempDir;

fn setup() -> (MemoryStorage, HistoryStore) {
    let storage = MemoryStorage::new();
    let store = HistoryStore::new(Box::new(storage.clone()));
    (storage, store)
}

fn persisted(storage: &MemoryStorage, record: &str) -> Vec<String> {
    serde_json::from_str(&storage.contents(record).unwrap()).unwrap()
}

/// Creates a download directory with one real file and one missing path.
fn downloads(store: &mut HistoryStore) -> (TempDir, String, String) {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("present.zip");
    fs::write(&present, b"data").unwrap();
    let present = present.to_string_lossy().to_string();
    let missing = dir.path().join("gone.zip").to_string_lossy().to_string();
    store.record_download(&present).unwrap();
    store.record_download(&missing).unwrap();
    (dir, present, missing)
}

// === HistoryViewer ===

#[test]
fn test_history_viewer_lists_and_deletes() {
    let (storage, mut store) = setup();
    for url in ["https://a.org/", "https://b.org/", "https://a.org/"] {
        store.record_visit(url).unwrap();
    }
    let mut viewer = HistoryViewer::new(&mut store);
    assert_eq!(viewer.entries().len(), 3);

    // Deleting by row removes that exact entry, not the first match.
    assert_eq!(viewer.delete(2).unwrap(), "https://a.org/");
    assert_eq!(viewer.entries(), ["https://a.org/", "https://b.org/"]);
    assert_eq!(persisted(&storage, "history.json"), vec!["https://a.org/", "https://b.org/"]);

    assert!(matches!(viewer.delete(7), Err(ViewerError::NoSuchRow(7))));
}

#[test]
fn test_history_viewer_clear_all() {
    let (storage, mut store) = setup();
    store.record_visit("https://a.org/").unwrap();
    let mut viewer = HistoryViewer::new(&mut store);
    viewer.clear_all().unwrap();
    assert!(viewer.entries().is_empty());
    assert!(viewer.render_html().contains("No history"));
    assert!(persisted(&storage, "history.json").is_empty());
}

#[test]
fn test_history_viewer_escapes_entries() {
    let (_storage, mut store) = setup();
    store.record_visit("https://a.org/?q=<script>").unwrap();
    let viewer = HistoryViewer::new(&mut store);
    let html = viewer.render_html();
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("q=<script>"));
}

// === DownloadViewer ===

#[test]
fn test_rows_flag_missing_files() {
    let (_storage, mut store) = setup();
    let (_dir, present, missing) = downloads(&mut store);
    let viewer = DownloadViewer::new(&mut store);

    let rows = viewer.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].path, present);
    assert!(!rows[0].missing);
    assert_eq!(rows[1].path, missing);
    assert!(rows[1].missing);
    assert_eq!(viewer.render_html().matches("class=\"missing\"").count(), 1);
}

#[test]
fn test_missing_flag_is_computed_each_time() {
    let (_storage, mut store) = setup();
    let (_dir, present, _missing) = downloads(&mut store);
    let viewer = DownloadViewer::new(&mut store);
    assert!(!viewer.rows()[0].missing);
    fs::remove_file(&present).unwrap();
    assert!(viewer.rows()[0].missing);
    // Nothing is pruned automatically.
    assert_eq!(viewer.entries().len(), 2);
}

#[test]
fn test_remove_entry_leaves_file() {
    let (storage, mut store) = setup();
    let (_dir, present, missing) = downloads(&mut store);
    let mut viewer = DownloadViewer::new(&mut store);

    assert_eq!(viewer.remove_entry(0).unwrap(), present);
    assert!(fs::metadata(&present).is_ok());
    assert_eq!(persisted(&storage, "downloads.json"), vec![missing]);
}

#[test]
fn test_delete_file_removes_file_and_entry() {
    let (storage, mut store) = setup();
    let (_dir, present, missing) = downloads(&mut store);
    let mut viewer = DownloadViewer::new(&mut store);

    assert_eq!(viewer.delete_file(0).unwrap(), present);
    assert!(fs::metadata(&present).is_err());
    assert_eq!(persisted(&storage, "downloads.json"), vec![missing]);
}

#[test]
fn test_delete_file_of_missing_entry_only_removes_entry() {
    let (_storage, mut store) = setup();
    let (_dir, present, missing) = downloads(&mut store);
    let mut viewer = DownloadViewer::new(&mut store);

    assert_eq!(viewer.delete_file(1).unwrap(), missing);
    assert_eq!(viewer.entries(), [present]);
}

#[test]
fn test_failed_file_deletion_keeps_entry() {
    let (storage, mut store) = setup();
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be removed with remove_file.
    let stubborn = dir.path().join("folder.zip");
    fs::create_dir(&stubborn).unwrap();
    let stubborn = stubborn.to_string_lossy().to_string();
    store.record_download(&stubborn).unwrap();
    let writes = storage.writes();

    let mut viewer = DownloadViewer::new(&mut store);
    let err = viewer.delete_file(0).unwrap_err();
    assert!(matches!(err, ViewerError::FileDeletion { .. }));
    assert_eq!(viewer.entries(), [stubborn]);
    assert_eq!(storage.writes(), writes);
}

#[test]
fn test_download_viewer_clear_all_keeps_files() {
    let (storage, mut store) = setup();
    let (_dir, present, _missing) = downloads(&mut store);
    let mut viewer = DownloadViewer::new(&mut store);
    viewer.clear_all().unwrap();
    assert!(viewer.entries().is_empty());
    assert!(fs::metadata(&present).is_ok());
    assert!(persisted(&storage, "downloads.json").is_empty());
    assert!(viewer.render_html().contains("No downloads"));
}

#[test]
fn test_download_viewer_bad_row() {
    let (_storage, mut store) = setup();
    let mut viewer = DownloadViewer::new(&mut store);
    assert!(matches!(viewer.remove_entry(0), Err(ViewerError::NoSuchRow(0))));
    assert!(matches!(viewer.delete_file(0), Err(ViewerError::NoSuchRow(0))));
}
