//! Property-based tests for history store operations.
//!
//! These tests verify the visit log invariants for arbitrary sequences of
//! navigations: no two adjacent entries are equal, inline documents never
//! appear, and what is saved is exactly what is loaded back.

use minibrowser::managers::history_store::{HistoryStore, HistoryStoreTrait};
use minibrowser::storage::MemoryStorage;
use proptest::prelude::*;

/// Strategy for visited URLs, drawn from a small pool so repeats are common.
fn arb_url() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("https://a.org/".to_string()),
        Just("https://b.org/".to_string()),
        Just("http://c.net/page".to_string()),
        "[a-z]{1,8}".prop_map(|host| format!("https://{}.com/", host)),
        "[A-Za-z0-9]{1,12}".prop_map(|body| format!("data:text/html;base64,{}", body)),
    ]
}

fn arb_download() -> impl Strategy<Value = String> {
    "/[a-z]{1,8}/[a-z]{1,8}\\.(zip|pdf|txt)"
}

// **Property: the visit log has no adjacent duplicates**
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn visit_log_has_no_adjacent_duplicates(urls in prop::collection::vec(arb_url(), 0..40)) {
        let mut store = HistoryStore::new(Box::new(MemoryStorage::new()));
        for url in &urls {
            store.record_visit(url).unwrap();
        }
        for pair in store.visits().windows(2) {
            prop_assert_ne!(&pair[0], &pair[1]);
        }
    }
}

// **Property: inline documents are never appended**
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn inline_documents_never_recorded(urls in prop::collection::vec(arb_url(), 0..40)) {
        let mut store = HistoryStore::new(Box::new(MemoryStorage::new()));
        for url in &urls {
            store.record_visit(url).unwrap();
        }
        prop_assert!(store.visits().iter().all(|v| !v.starts_with("data:")));
        let real = urls.iter().filter(|u| !u.starts_with("data:")).count();
        prop_assert!(store.visits().len() <= real);
    }
}

// **Property: save then load round-trips both logs**
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn save_then_load_roundtrip(
        urls in prop::collection::vec(arb_url(), 0..20),
        downloads in prop::collection::vec(arb_download(), 0..10),
    ) {
        let storage = MemoryStorage::new();
        let mut store = HistoryStore::new(Box::new(storage.clone()));
        for url in &urls {
            store.record_visit(url).unwrap();
        }
        for path in &downloads {
            store.record_download(path).unwrap();
        }
        store.save().unwrap();

        let mut reloaded = HistoryStore::new(Box::new(storage));
        reloaded.load().unwrap();
        prop_assert_eq!(reloaded.visits(), store.visits());
        prop_assert_eq!(reloaded.downloads(), &downloads[..]);
    }
}
