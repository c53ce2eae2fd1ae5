//! Durable storage for the history records.
//!
//! A record is a named blob of text (one JSON array per record). The
//! [`RecordStorage`] trait is the only thing `HistoryStore` depends on, so the
//! same store runs against the user data directory or fully in memory.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::types::errors::StorageError;

/// Named-record storage collaborator.
pub trait RecordStorage {
    /// Reads a record. A record that does not exist yet yields `Ok(None)`;
    /// every other failure is an error.
    fn read(&self, record: &str) -> Result<Option<String>, StorageError>;

    /// Replaces a record's contents, creating it if absent.
    fn write(&self, record: &str, contents: &str) -> Result<(), StorageError>;
}
