//! Read/delete view over the visit log.

use std::ops::DerefMut;

use crate::managers::history_store::{HistoryStore, HistoryStoreTrait};
use crate::services::internal_pages::render_history_page;
use crate::types::errors::ViewerError;

/// Lists visits in stored order; every change is persisted before returning.
pub struct HistoryViewer<S: DerefMut<Target = HistoryStore>> {
    store: S,
}

impl<S: DerefMut<Target = HistoryStore>> HistoryViewer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> &[String] {
        self.store.visits()
    }

    /// Deletes the entry at `row` and returns it.
    pub fn delete(&mut self, row: usize) -> Result<String, ViewerError> {
        self.store
            .remove_visit_at(row)?
            .ok_or(ViewerError::NoSuchRow(row))
    }

    pub fn clear_all(&mut self) -> Result<(), ViewerError> {
        self.store.clear_visits()?;
        Ok(())
    }

    pub fn render_html(&self) -> String {
        render_history_page(self.entries())
    }
}
