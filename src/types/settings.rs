use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level browser settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BrowserSettings {
    pub navigation: NavigationSettings,
    pub storage: StorageSettings,
    pub decorative_image: DecorativeImageSettings,
    pub window: WindowSettings,
}

/// How address-bar input is turned into a URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationSettings {
    /// Search URL with `{}` standing in for the `+`-joined query.
    pub search_url_template: String,
    /// Scheme prepended to input typed without one.
    pub default_scheme: String,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            search_url_template: "https://www.google.com/search?q={}".to_string(),
            default_scheme: "http".to_string(),
        }
    }
}

/// Where the history records live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the platform data directory when set.
    pub data_dir: Option<PathBuf>,
    pub history_file: String,
    pub downloads_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_file: "history.json".to_string(),
            downloads_file: "downloads.json".to_string(),
        }
    }
}

/// The random image shown on the new-tab page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorativeImageSettings {
    pub enabled: bool,
    pub endpoint: String,
    /// Name of the environment variable holding the API access key.
    pub access_key_env: String,
    pub timeout_secs: u64,
}

impl Default for DecorativeImageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.unsplash.com/photos/random".to_string(),
            access_key_env: "UNSPLASH_ACCESS_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Main window geometry and title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "My Web Browser".to_string(),
            width: 800.0,
            height: 600.0,
        }
    }
}
