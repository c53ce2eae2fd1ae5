use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the shell tells the engine after a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadDecision {
    /// Save to the given final path.
    Accepted(PathBuf),
    /// The user cancelled the save dialog.
    Rejected,
}

/// One row of the download viewer, computed at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadRow {
    pub path: String,
    /// The file no longer exists on disk.
    pub missing: bool,
}
