// MiniBrowser platform paths for Linux
// Config: ~/.config/minibrowser
// Data:   ~/.local/share/minibrowser

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for MiniBrowser on Linux.
/// Uses `$XDG_CONFIG_HOME/minibrowser` if set, otherwise `~/.config/minibrowser`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("minibrowser"),
        _ => home_dir().join(".config").join("minibrowser"),
    }
}

/// Returns the data directory for MiniBrowser on Linux.
/// Uses `$XDG_DATA_HOME/minibrowser` if set, otherwise `~/.local/share/minibrowser`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("minibrowser"),
        _ => home_dir().join(".local").join("share").join("minibrowser"),
    }
}
