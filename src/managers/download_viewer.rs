//! Read/delete view over the download log.
//!
//! Whether a downloaded file still exists is checked each time rows are
//! produced; nothing is cached and missing files are never pruned automatically.

use std::fs;
use std::ops::DerefMut;
use std::path::Path;

use log::{info, warn};

use crate::managers::history_store::{HistoryStore, HistoryStoreTrait};
use crate::services::internal_pages::render_downloads_page;
use crate::types::download::DownloadRow;
use crate::types::errors::ViewerError;

pub struct DownloadViewer<S: DerefMut<Target = HistoryStore>> {
    store: S,
}

impl<S: DerefMut<Target = HistoryStore>> DownloadViewer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> &[String] {
        self.store.downloads()
    }

    /// Current rows, with the "missing" flag computed now.
    pub fn rows(&self) -> Vec<DownloadRow> {
        self.entries()
            .iter()
            .map(|path| DownloadRow {
                path: path.clone(),
                missing: !Path::new(path).exists(),
            })
            .collect()
    }

    /// Removes the entry at `row` from the log, leaving the file alone.
    pub fn remove_entry(&mut self, row: usize) -> Result<String, ViewerError> {
        self.store
            .remove_download_at(row)?
            .ok_or(ViewerError::NoSuchRow(row))
    }

    /// Deletes the file behind the entry at `row`, then removes the entry.
    /// A file that is already gone is not touched. If deletion fails the entry
    /// stays in the log.
    pub fn delete_file(&mut self, row: usize) -> Result<String, ViewerError> {
        let path = self
            .entries()
            .get(row)
            .cloned()
            .ok_or(ViewerError::NoSuchRow(row))?;

        let file = Path::new(&path);
        if file.exists() {
            if let Err(source) = fs::remove_file(file) {
                warn!("could not delete {}: {}", path, source);
                return Err(ViewerError::FileDeletion {
                    path: file.to_path_buf(),
                    source,
                });
            }
            info!("deleted {}", path);
        }
        self.remove_entry(row)
    }

    pub fn clear_all(&mut self) -> Result<(), ViewerError> {
        self.store.clear_downloads()?;
        Ok(())
    }

    pub fn render_html(&self) -> String {
        render_downloads_page(&self.rows())
    }
}
