use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of an open tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(String);

impl TabId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Address-bar text buffer with a cursor measured in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBar {
    text: String,
    cursor: usize,
}

impl AddressBar {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the text as if typed by the user; the cursor ends up after the last character.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    /// Shows a URL with the cursor at the start so the scheme and host stay visible.
    pub fn show_url(&mut self, url: &str) {
        self.text = url.to_string();
        self.cursor = 0;
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// Outcome of closing a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabCloseOutcome {
    /// Other tabs remain open.
    Remaining(usize),
    /// The closed tab was the last one; the window should close.
    LastTabClosed,
}

/// Entries of the "more options" menu next to the address bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    OpenHistoryViewer,
    OpenDownloadViewer,
}

impl MenuAction {
    pub const ALL: [MenuAction; 2] = [MenuAction::OpenHistoryViewer, MenuAction::OpenDownloadViewer];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::OpenHistoryViewer => "History",
            MenuAction::OpenDownloadViewer => "Download History",
        }
    }
}

/// Snapshot of a tab used when rendering the tab strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabSummary {
    pub id: TabId,
    pub label: String,
    pub url: Option<String>,
    pub address: String,
}
