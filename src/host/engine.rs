use crate::types::tab::TabId;

/// One page session inside the embedded engine, owned by exactly one tab.
///
/// Loads are fire-and-forget: the engine reports progress later through
/// `ShellEvent::UrlChanged` / `ShellEvent::TitleChanged`, never re-entrantly.
pub trait PageSession {
    /// Starts loading `url`.
    fn load_url(&mut self, url: &str);

    /// Renders an inline HTML document.
    fn load_html(&mut self, html: &str);

    /// Tears the session down without waiting for in-flight loads.
    fn close(&mut self);
}

/// Factory for page sessions.
pub trait WebEngine {
    fn create_session(&mut self, tab: &TabId) -> Box<dyn PageSession>;
}
