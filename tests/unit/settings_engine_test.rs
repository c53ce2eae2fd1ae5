//! Unit tests for loading and saving `settings.json`.

use std::fs;
use std::path::PathBuf;

use minibrowser::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use minibrowser::types::errors::SettingsError;
use minibrowser::types::settings::BrowserSettings;
use tempfile::TempDir;

fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("settings.json");
    (dir, path)
}

#[test]
fn test_defaults_when_file_missing() {
    let (_dir, path) = setup();
    let mut engine = SettingsEngine::new(Some(path));
    let settings = engine.load().unwrap();
    assert_eq!(settings, BrowserSettings::default());
    assert_eq!(settings.navigation.default_scheme, "http");
    assert_eq!(
        settings.navigation.search_url_template,
        "https://www.google.com/search?q={}"
    );
    assert_eq!(settings.storage.history_file, "history.json");
    assert_eq!(settings.storage.downloads_file, "downloads.json");
    assert!(settings.decorative_image.enabled);
}

#[test]
fn test_partial_file_is_filled_with_defaults() {
    let (_dir, path) = setup();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"navigation": {"default_scheme": "https"}, "decorative_image": {"enabled": false}}"#,
    )
    .unwrap();

    let mut engine = SettingsEngine::new(Some(path));
    let settings = engine.load().unwrap();
    assert_eq!(settings.navigation.default_scheme, "https");
    assert_eq!(
        settings.navigation.search_url_template,
        "https://www.google.com/search?q={}"
    );
    assert!(!settings.decorative_image.enabled);
    assert_eq!(settings.window, BrowserSettings::default().window);
}

#[test]
fn test_malformed_file_is_an_error() {
    let (_dir, path) = setup();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();
    let mut engine = SettingsEngine::new(Some(path));
    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

#[test]
fn test_update_then_load_roundtrip() {
    let (_dir, path) = setup();
    let mut engine = SettingsEngine::new(Some(path.clone()));
    let mut settings = BrowserSettings::default();
    settings.navigation.search_url_template = "https://duckduckgo.com/?q={}".to_string();
    settings.storage.data_dir = Some(PathBuf::from("/var/lib/minibrowser"));
    engine.update(settings.clone()).unwrap();
    assert!(path.exists());

    let mut reloaded = SettingsEngine::new(Some(path));
    assert_eq!(reloaded.load().unwrap(), settings);
}

#[test]
fn test_reset_restores_defaults() {
    let (_dir, path) = setup();
    let mut engine = SettingsEngine::new(Some(path.clone()));
    let mut settings = BrowserSettings::default();
    settings.window.title = "Custom".to_string();
    engine.update(settings).unwrap();
    engine.reset().unwrap();
    assert_eq!(engine.get_settings(), &BrowserSettings::default());

    let mut reloaded = SettingsEngine::new(Some(path));
    assert_eq!(reloaded.load().unwrap(), BrowserSettings::default());
}

#[test]
fn test_config_path_override() {
    let (_dir, path) = setup();
    let engine = SettingsEngine::new(Some(path.clone()));
    assert_eq!(engine.get_config_path(), path.as_path());
}
