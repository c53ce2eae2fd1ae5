//! In-memory record storage.
//!
//! Clones share the same records, so a test (or the console demo) can drop a
//! `HistoryStore` and load a fresh one from the same storage to simulate a restart.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::RecordStorage;
use crate::types::errors::StorageError;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, String>,
    writes: usize,
}

/// Record storage kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of record writes performed through any clone.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Raw contents of a record, if it has been written.
    pub fn contents(&self, record: &str) -> Option<String> {
        self.inner.borrow().records.get(record).cloned()
    }

    /// Seeds a record without counting it as a write.
    pub fn insert(&self, record: &str, contents: &str) {
        self.inner
            .borrow_mut()
            .records
            .insert(record.to_string(), contents.to_string());
    }
}

impl RecordStorage for MemoryStorage {
    fn read(&self, record: &str) -> Result<Option<String>, StorageError> {
        Ok(self.contents(record))
    }

    fn write(&self, record: &str, contents: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        inner.records.insert(record.to_string(), contents.to_string());
        inner.writes += 1;
        Ok(())
    }
}
