// MiniBrowser platform paths for macOS
// Config: ~/Library/Application Support/MiniBrowser
// Data:   ~/Library/Application Support/MiniBrowser

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

fn application_support() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("MiniBrowser")
}

/// `~/Library/Application Support/MiniBrowser`
pub fn get_config_dir() -> PathBuf {
    application_support()
}

/// `~/Library/Application Support/MiniBrowser`
pub fn get_data_dir() -> PathBuf {
    application_support()
}
