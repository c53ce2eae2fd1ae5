//! History Store for MiniBrowser.
//!
//! Keeps two ordered logs, visited URLs and completed download paths, and
//! persists each one as an independent JSON array of strings through a
//! [`RecordStorage`]. Every mutation flushes the affected log before returning;
//! if that write fails the in-memory log is put back as it was.

use log::{debug, info};

use crate::services::placeholder_page::is_reserved_document_url;
use crate::storage::RecordStorage;
use crate::types::errors::StorageError;
use crate::types::settings::StorageSettings;

/// Trait defining history store operations.
pub trait HistoryStoreTrait {
    fn load(&mut self) -> Result<(), StorageError>;
    fn save(&self) -> Result<(), StorageError>;
    fn record_visit(&mut self, url: &str) -> Result<bool, StorageError>;
    fn record_download(&mut self, path: &str) -> Result<(), StorageError>;
    fn remove_visit(&mut self, url: &str) -> Result<bool, StorageError>;
    fn remove_visit_at(&mut self, index: usize) -> Result<Option<String>, StorageError>;
    fn remove_download(&mut self, path: &str) -> Result<bool, StorageError>;
    fn remove_download_at(&mut self, index: usize) -> Result<Option<String>, StorageError>;
    fn clear_visits(&mut self) -> Result<(), StorageError>;
    fn clear_downloads(&mut self) -> Result<(), StorageError>;
    fn visits(&self) -> &[String];
    fn downloads(&self) -> &[String];
}

/// Visit and download logs backed by a storage collaborator.
pub struct HistoryStore {
    storage: Box<dyn RecordStorage>,
    history_record: String,
    downloads_record: String,
    visits: Vec<String>,
    downloads: Vec<String>,
}

impl HistoryStore {
    /// Creates an empty store using the default record names.
    pub fn new(storage: Box<dyn RecordStorage>) -> Self {
        Self::with_settings(storage, &StorageSettings::default())
    }

    /// Creates an empty store using the record names from `settings`.
    pub fn with_settings(storage: Box<dyn RecordStorage>, settings: &StorageSettings) -> Self {
        Self {
            storage,
            history_record: settings.history_file.clone(),
            downloads_record: settings.downloads_file.clone(),
            visits: Vec::new(),
            downloads: Vec::new(),
        }
    }

    fn read_log(&self, record: &str) -> Result<Vec<String>, StorageError> {
        match self.storage.read(record)? {
            None => Ok(Vec::new()),
            Some(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Some(contents) => {
                serde_json::from_str(&contents).map_err(|source| StorageError::Malformed {
                    record: record.to_string(),
                    source,
                })
            }
        }
    }

    fn write_log(&self, record: &str, entries: &[String]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            StorageError::Malformed {
                record: record.to_string(),
                source,
            }
        })?;
        self.storage.write(record, &json)
    }

    /// Writes the visit log only.
    pub fn flush_visits(&self) -> Result<(), StorageError> {
        self.write_log(&self.history_record, &self.visits)
    }

    /// Writes the download log only.
    pub fn flush_downloads(&self) -> Result<(), StorageError> {
        self.write_log(&self.downloads_record, &self.downloads)
    }
}

fn position_of(log: &[String], value: &str) -> Option<usize> {
    log.iter().position(|entry| entry == value)
}

impl HistoryStoreTrait for HistoryStore {
    /// Replaces both in-memory logs with what is in storage. Missing records
    /// yield empty logs.
    fn load(&mut self) -> Result<(), StorageError> {
        let visits = self.read_log(&self.history_record)?;
        let downloads = self.read_log(&self.downloads_record)?;
        info!(
            "loaded {} visits and {} downloads",
            visits.len(),
            downloads.len()
        );
        self.visits = visits;
        self.downloads = downloads;
        Ok(())
    }

    fn save(&self) -> Result<(), StorageError> {
        self.flush_visits()?;
        self.flush_downloads()
    }

    /// Appends a visit unless it repeats the previous entry or is an inline
    /// placeholder document. Returns whether the log changed.
    fn record_visit(&mut self, url: &str) -> Result<bool, StorageError> {
        if is_reserved_document_url(url) {
            return Ok(false);
        }
        if self.visits.last().map(String::as_str) == Some(url) {
            debug!("skipping repeated visit {}", url);
            return Ok(false);
        }
        self.visits.push(url.to_string());
        if let Err(e) = self.flush_visits() {
            self.visits.pop();
            return Err(e);
        }
        Ok(true)
    }

    fn record_download(&mut self, path: &str) -> Result<(), StorageError> {
        self.downloads.push(path.to_string());
        if let Err(e) = self.flush_downloads() {
            self.downloads.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Removes the first occurrence of `url`.
    fn remove_visit(&mut self, url: &str) -> Result<bool, StorageError> {
        match position_of(&self.visits, url) {
            Some(index) => self.remove_visit_at(index).map(|removed| removed.is_some()),
            None => Ok(false),
        }
    }

    fn remove_visit_at(&mut self, index: usize) -> Result<Option<String>, StorageError> {
        if index >= self.visits.len() {
            return Ok(None);
        }
        let removed = self.visits.remove(index);
        if let Err(e) = self.flush_visits() {
            self.visits.insert(index, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Removes the first occurrence of `path`.
    fn remove_download(&mut self, path: &str) -> Result<bool, StorageError> {
        match position_of(&self.downloads, path) {
            Some(index) => self.remove_download_at(index).map(|removed| removed.is_some()),
            None => Ok(false),
        }
    }

    fn remove_download_at(&mut self, index: usize) -> Result<Option<String>, StorageError> {
        if index >= self.downloads.len() {
            return Ok(None);
        }
        let removed = self.downloads.remove(index);
        if let Err(e) = self.flush_downloads() {
            self.downloads.insert(index, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    fn clear_visits(&mut self) -> Result<(), StorageError> {
        let previous = std::mem::take(&mut self.visits);
        if let Err(e) = self.flush_visits() {
            self.visits = previous;
            return Err(e);
        }
        Ok(())
    }

    fn clear_downloads(&mut self) -> Result<(), StorageError> {
        let previous = std::mem::take(&mut self.downloads);
        if let Err(e) = self.flush_downloads() {
            self.downloads = previous;
            return Err(e);
        }
        Ok(())
    }

    fn visits(&self) -> &[String] {
        &self.visits
    }

    fn downloads(&self) -> &[String] {
        &self.downloads
    }
}
