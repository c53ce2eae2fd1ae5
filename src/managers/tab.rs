//! A single browser tab.
//!
//! A tab owns one engine page session and one address bar, and turns the
//! engine's title/URL events into label and address-bar updates. Other
//! components observe it through registrable callback slots.

use log::debug;

use crate::host::engine::PageSession;
use crate::services::navigation_resolver::NavigationResolver;
use crate::services::placeholder_page::is_reserved_document_url;
use crate::types::errors::StorageError;
use crate::types::navigation::NavigationTarget;
use crate::types::tab::{AddressBar, TabId, TabSummary};

/// Label shown for pages without a title.
pub const UNTITLED: &str = "Untitled";

/// A committed navigation, as seen by URL-changed observers.
#[derive(Debug, Clone, Copy)]
pub struct UrlChange<'a> {
    pub tab: &'a TabId,
    pub url: &'a str,
    /// The navigation was started from this tab's address bar. Informational
    /// only: the address bar is rewritten and the visit is recorded the same
    /// way either way, and the flag is cleared before any observer runs so an
    /// observer cannot see it twice.
    pub user_initiated: bool,
}

/// What a new tab loads first.
#[derive(Debug, Clone)]
pub enum InitialContent<'a> {
    Url(&'a str),
    /// The new-tab placeholder document.
    Placeholder(String),
    /// Any other inline document, such as a viewer page.
    Document(String),
}

pub type UrlChangedSlot = Box<dyn FnMut(&UrlChange<'_>) -> Result<(), StorageError>>;
pub type TitleChangedSlot = Box<dyn FnMut(&TabId, &str)>;

pub struct Tab {
    id: TabId,
    label: String,
    address_bar: AddressBar,
    current_url: Option<String>,
    session: Box<dyn PageSession>,
    /// Set on address-bar submit, consumed by the next URL change and passed
    /// to observers in [`UrlChange`]. Nothing branches on it.
    user_initiated: bool,
    showing_placeholder: bool,
    closed: bool,
    url_slots: Vec<UrlChangedSlot>,
    title_slots: Vec<TitleChangedSlot>,
}

impl Tab {
    /// Creates a tab and starts its first load.
    pub fn create(id: TabId, session: Box<dyn PageSession>, initial: InitialContent<'_>) -> Self {
        let mut tab = Self {
            id,
            label: UNTITLED.to_string(),
            address_bar: AddressBar::default(),
            current_url: None,
            session,
            user_initiated: false,
            showing_placeholder: false,
            closed: false,
            url_slots: Vec::new(),
            title_slots: Vec::new(),
        };
        match initial {
            InitialContent::Url(url) => tab.navigate(url),
            InitialContent::Placeholder(html) => tab.show_placeholder(&html),
            InitialContent::Document(html) => tab.show_document(&html),
        }
        tab
    }

    pub fn id(&self) -> &TabId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn address_bar(&self) -> &AddressBar {
        &self.address_bar
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn is_showing_placeholder(&self) -> bool {
        self.showing_placeholder
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn summary(&self) -> TabSummary {
        TabSummary {
            id: self.id.clone(),
            label: self.label.clone(),
            url: self.current_url.clone(),
            address: self.address_bar.text().to_string(),
        }
    }

    /// Registers an observer for committed navigations.
    pub fn on_url_changed<F>(&mut self, slot: F)
    where
        F: FnMut(&UrlChange<'_>) -> Result<(), StorageError> + 'static,
    {
        self.url_slots.push(Box::new(slot));
    }

    /// Registers an observer for title changes.
    pub fn on_title_changed<F>(&mut self, slot: F)
    where
        F: FnMut(&TabId, &str) + 'static,
    {
        self.title_slots.push(Box::new(slot));
    }

    /// Replaces the address-bar text as typed by the user.
    pub fn set_address_text(&mut self, text: &str) {
        self.address_bar.set_text(text);
    }

    /// Handles Enter in the address bar: resolves the text and starts loading it.
    /// Empty input does nothing and returns `None`.
    pub fn submit(&mut self, resolver: &NavigationResolver) -> Option<NavigationTarget> {
        if self.closed {
            return None;
        }
        let target = resolver.resolve(self.address_bar.text())?;
        debug!("tab {} submit -> {}", self.id, target);
        self.user_initiated = true;
        self.showing_placeholder = false;
        self.session.load_url(target.as_str());
        self.address_bar.move_cursor_to_start();
        Some(target)
    }

    /// Loads `url` without going through the resolver.
    pub fn navigate(&mut self, url: &str) {
        if self.closed {
            return;
        }
        self.showing_placeholder = false;
        self.session.load_url(url);
    }

    /// Renders the placeholder (new-tab) document.
    pub fn show_placeholder(&mut self, html: &str) {
        if self.closed {
            return;
        }
        self.showing_placeholder = true;
        self.session.load_html(html);
    }

    /// Renders an arbitrary inline document, such as a viewer page.
    pub fn show_document(&mut self, html: &str) {
        if self.closed {
            return;
        }
        self.showing_placeholder = false;
        self.session.load_html(html);
    }

    /// Engine event: the document title changed.
    pub fn handle_title_changed(&mut self, title: &str) {
        self.label = if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title.to_string()
        };
        for slot in self.title_slots.iter_mut() {
            slot(&self.id, &self.label);
        }
    }

    /// Engine event: a navigation committed. Updates the address bar and
    /// notifies observers; the first observer error is returned after all
    /// observers have run.
    pub fn handle_url_changed(&mut self, url: &str) -> Result<(), StorageError> {
        let user_initiated = std::mem::take(&mut self.user_initiated);

        if is_reserved_document_url(url) {
            self.address_bar.clear();
        } else {
            self.address_bar.show_url(url);
        }
        self.current_url = Some(url.to_string());

        let change = UrlChange {
            tab: &self.id,
            url,
            user_initiated,
        };
        let mut first_err = None;
        for slot in self.url_slots.iter_mut() {
            if let Err(e) = slot(&change) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Tears down the page session and drops all observers.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.session.close();
        self.url_slots.clear();
        self.title_slots.clear();
    }
}

impl Drop for Tab {
    fn drop(&mut self) {
        self.close();
    }
}
