// MiniBrowser platform paths for Windows
// Config: %APPDATA%/MiniBrowser
// Data:   %APPDATA%/MiniBrowser

use std::env;
use std::path::PathBuf;

fn roaming_app_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("MiniBrowser")
}

/// `%APPDATA%/MiniBrowser`
pub fn get_config_dir() -> PathBuf {
    roaming_app_dir()
}

/// `%APPDATA%/MiniBrowser`
pub fn get_data_dir() -> PathBuf {
    roaming_app_dir()
}
