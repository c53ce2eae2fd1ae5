// MiniBrowser platform abstraction
// Provides platform-specific paths for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::{Path, PathBuf};

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for MiniBrowser.
///
/// - **Linux**: `~/.config/minibrowser` (or `$XDG_CONFIG_HOME/minibrowser`)
/// - **macOS**: `~/Library/Application Support/MiniBrowser`
/// - **Windows**: `%APPDATA%/MiniBrowser`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory for MiniBrowser.
///
/// - **Linux**: `~/.local/share/minibrowser` (or `$XDG_DATA_HOME/minibrowser`)
/// - **macOS**: `~/Library/Application Support/MiniBrowser`
/// - **Windows**: `%APPDATA%/MiniBrowser`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// The directory holding the history records: the override if one is configured,
/// otherwise the platform data directory.
pub fn resolve_data_dir(override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => get_data_dir(),
    }
}
