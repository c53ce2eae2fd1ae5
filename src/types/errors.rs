use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::tab::TabId;

// === StorageError ===

/// Errors raised while reading or writing the persisted history records.
///
/// A record that does not exist yet is not an error; see `RecordStorage::read`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage directory could not be created.
    #[error("Failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading a record failed for a reason other than "not found".
    #[error("Failed to read record '{record}': {source}")]
    Read {
        record: String,
        #[source]
        source: io::Error,
    },
    /// Writing a record failed.
    #[error("Failed to write record '{record}': {source}")]
    Write {
        record: String,
        #[source]
        source: io::Error,
    },
    /// A record exists but is not an array of strings.
    #[error("Record '{record}' is malformed: {source}")]
    Malformed {
        record: String,
        #[source]
        source: serde_json::Error,
    },
}

// === TabError ===

/// Errors related to tab management operations.
#[derive(Debug, Error)]
pub enum TabError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(TabId),
    /// The host has already been torn down.
    #[error("Tab host is closed")]
    HostClosed,
}

// === ImageError ===

/// Failures of the best-effort decorative image fetch. Never fatal.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImageError {
    /// No access key is configured in the environment.
    #[error("No image API access key in ${0}")]
    MissingCredential(String),
    /// Fetching is switched off in settings.
    #[error("Decorative image fetching is disabled")]
    Disabled,
    /// The request failed or returned a non-success status.
    #[error("Image API request failed: {0}")]
    Network(String),
    /// The response body could not be understood.
    #[error("Image API response could not be parsed: {0}")]
    Parse(String),
}

// === ViewerError ===

/// Errors raised by the history and download viewers.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// No row exists at the given position.
    #[error("No entry at row {0}")]
    NoSuchRow(usize),
    /// The command came from a tab that is not showing the matching viewer.
    #[error("Tab {0} is not showing this viewer")]
    NotAViewer(TabId),
    /// The underlying download file could not be removed; the entry is kept.
    #[error("Failed to delete {path}: {source}")]
    FileDeletion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Persisting the change failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// === SettingsError ===

/// Errors related to the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File system I/O failed.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// The settings file is not valid JSON for `BrowserSettings`.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
}

// === ShellError ===

/// Top-level error surfaced by `BrowserShell`.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Tab(#[from] TabError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    /// An operation was attempted after `shutdown()`.
    #[error("Browser shell has already shut down")]
    ShutDown,
}
