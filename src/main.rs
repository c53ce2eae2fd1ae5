//! MiniBrowser: a minimal tabbed web browser shell.
//!
//! Entry point: opens the browser window when built with the `gui` feature.
//! Without it, runs a console demo against the in-process headless engine.

#[cfg(feature = "gui")]
fn main() {
    env_logger::init();
    if let Err(e) = minibrowser::ui::webview_app::run() {
        log::error!("MiniBrowser failed to start: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "gui"))]
fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              MiniBrowser v{} - Demo Mode                  ║", env!("CARGO_PKG_VERSION"));
    println!("║     Tabbed browser shell with persistent history            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_navigation();
    demo_settings();
    if let Err(e) = demo_shell() {
        eprintln!("  ✗ Browser shell demo failed: {}", e);
        std::process::exit(1);
    }

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated successfully!");
    println!("  Build with --features gui for the browser window.");
    println!("═══════════════════════════════════════════════════════════════");
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

#[cfg(not(feature = "gui"))]
fn demo_navigation() {
    use minibrowser::services::navigation_resolver::NavigationResolver;
    section("Navigation Resolver");

    let resolver = NavigationResolver::default();
    for input in ["example.com", "https://www.rust-lang.org", "how to bake bread", "localhost"] {
        match resolver.resolve(input) {
            Some(target) if target.is_search() => println!("  {:<28} → search {}", input, target),
            Some(target) => println!("  {:<28} → {}", input, target),
            None => println!("  {:<28} → (ignored)", input),
        }
    }
    println!("  ✓ NavigationResolver OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_settings() {
    use minibrowser::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
    section("Settings Engine");

    let path = std::env::temp_dir().join(format!("minibrowser-demo-{}.json", std::process::id()));
    let mut engine = SettingsEngine::new(Some(path.clone()));
    match engine.load() {
        Ok(settings) => {
            println!("  Search template: {}", settings.navigation.search_url_template);
            println!("  Default scheme: {}", settings.navigation.default_scheme);
            println!("  Decorative image: {}", settings.decorative_image.enabled);
        }
        Err(e) => println!("  Failed to load settings: {}", e),
    }
    let _ = std::fs::remove_file(&path);
    println!("  ✓ SettingsEngine OK");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_shell() -> Result<(), minibrowser::types::errors::ShellError> {
    use std::path::Path;

    use minibrowser::app::{BrowserShell, ShellParts};
    use minibrowser::host::dialog::ScriptedDialog;
    use minibrowser::host::events::event_channel;
    use minibrowser::host::headless::HeadlessEngine;
    use minibrowser::managers::history_store::HistoryStoreTrait;
    use minibrowser::managers::tab_host::TabHostTrait;
    use minibrowser::services::decorative_image::ImageFetcher;
    use minibrowser::storage::MemoryStorage;
    use minibrowser::types::settings::BrowserSettings;
    use minibrowser::types::tab::MenuAction;
    section("Browser Shell (headless)");

    let mut settings = BrowserSettings::default();
    settings.decorative_image.enabled = false;

    let (events, mut rx) = event_channel();
    let storage = MemoryStorage::new();
    let dialog = std::rc::Rc::new(ScriptedDialog::new());
    dialog.answer(Some("/tmp/report".into()));

    let mut shell = BrowserShell::new(
        settings.clone(),
        ShellParts {
            engine: Box::new(HeadlessEngine::new(events.clone())),
            storage: Box::new(storage.clone()),
            dialog: Box::new(dialog),
            images: ImageFetcher::from_settings(&settings.decorative_image),
            events,
        },
    );

    let first = shell.startup()?;
    shell.pump(&mut rx)?;
    println!("  Opened placeholder tab {}", first);

    shell.navigate_from_input(&first, "example.com")?;
    shell.navigate_from_input(&first, "rust programming language")?;
    shell.pump(&mut rx)?;
    if let Some(tab) = shell.tabs().get_active_tab() {
        println!("  Active tab: '{}' at {}", tab.label(), tab.address_bar().text());
    }

    let second = shell.new_tab(Some("https://www.rust-lang.org/"))?;
    shell.pump(&mut rx)?;
    println!("  Tabs open: {}", shell.tabs().tab_count());

    let decision = shell.handle_download_requested(
        "https://example.com/files/report.pdf",
        Path::new("/tmp/report.pdf"),
    );
    println!("  Download decision: {:?}", decision);
    shell.handle_download_finished("https://example.com/files/report.pdf", None, true)?;

    println!("  Visits: {:?}", shell.history().visits());
    println!("  Downloads: {:?}", shell.history().downloads());

    let viewer = shell.open_viewer_tab(MenuAction::OpenHistoryViewer)?;
    shell.pump(&mut rx)?;
    println!("  Opened history viewer in tab {}", viewer);

    shell.close_tab(&viewer)?;
    shell.close_tab(&second)?;
    shell.close_tab(&first)?;
    println!("  Shell state after last tab closed: {:?}", shell.state());
    println!("  Storage writes: {}", storage.writes());
    println!("  ✓ BrowserShell OK");
    println!();
    Ok(())
}
