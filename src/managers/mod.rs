// MiniBrowser state managers
// Managers handle stateful operations: history persistence, tabs, and the viewers over history.

pub mod download_viewer;
pub mod history_store;
pub mod history_viewer;
pub mod tab;
pub mod tab_host;
