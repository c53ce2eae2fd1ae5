use log::{debug, info};

use crate::host::engine::WebEngine;
use crate::managers::tab::{InitialContent, Tab};
use crate::services::placeholder_page::{ImageSlot, PlaceholderPage};
use crate::types::errors::TabError;
use crate::types::tab::{MenuAction, TabCloseOutcome, TabId, TabSummary};

/// Trait defining the tab host interface.
pub trait TabHostTrait {
    fn create_tab(&mut self, url: Option<&str>) -> Result<TabId, TabError>;
    fn open_document(&mut self, html: &str) -> Result<TabId, TabError>;
    fn close_tab(&mut self, tab_id: &TabId) -> Result<TabCloseOutcome, TabError>;
    fn switch_tab(&mut self, tab_id: &TabId) -> Result<(), TabError>;
    fn close_all(&mut self);
    fn get_tab(&self, tab_id: &TabId) -> Option<&Tab>;
    fn get_tab_mut(&mut self, tab_id: &TabId) -> Option<&mut Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn get_all_tabs(&self) -> Vec<TabSummary>;
    fn tab_count(&self) -> usize;
    fn menu_actions(&self) -> &'static [MenuAction];
}

type TabCreatedHook = Box<dyn FnMut(&mut Tab)>;

/// Ordered collection of open tabs sharing one engine.
pub struct TabHost {
    engine: Box<dyn WebEngine>,
    placeholder: PlaceholderPage,
    /// Image slot rendered into a fresh placeholder page.
    initial_slot: InitialSlot,
    tabs: Vec<Tab>,
    active_tab_id: Option<TabId>,
    created_hooks: Vec<TabCreatedHook>,
    closed: bool,
}

/// How a freshly created placeholder shows its decorative image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSlot {
    Omitted,
    Loading,
}

impl TabHost {
    pub fn new(engine: Box<dyn WebEngine>, placeholder: PlaceholderPage) -> Self {
        Self {
            engine,
            placeholder,
            initial_slot: InitialSlot::Omitted,
            tabs: Vec::new(),
            active_tab_id: None,
            created_hooks: Vec::new(),
            closed: false,
        }
    }

    pub fn set_initial_slot(&mut self, slot: InitialSlot) {
        self.initial_slot = slot;
    }

    pub fn placeholder(&self) -> &PlaceholderPage {
        &self.placeholder
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn active_tab_id(&self) -> Option<&TabId> {
        self.active_tab_id.as_ref()
    }

    /// Registers a hook run on every new tab right after it is created,
    /// typically to attach callback slots.
    pub fn on_tab_created<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Tab) + 'static,
    {
        self.created_hooks.push(Box::new(hook));
    }

    fn find_tab_index(&self, tab_id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == tab_id)
    }

    fn open(&mut self, initial: InitialContent<'_>) -> Result<TabId, TabError> {
        if self.closed {
            return Err(TabError::HostClosed);
        }
        let id = TabId::new();
        let session = self.engine.create_session(&id);
        let mut tab = Tab::create(id.clone(), session, initial);
        for hook in self.created_hooks.iter_mut() {
            hook(&mut tab);
        }
        self.tabs.push(tab);
        self.active_tab_id = Some(id.clone());
        debug!("opened tab {} ({} open)", id, self.tabs.len());
        Ok(id)
    }
}

impl TabHostTrait for TabHost {
    /// Opens a new tab at the end of the strip and makes it active. Without a
    /// URL the tab shows the placeholder page.
    fn create_tab(&mut self, url: Option<&str>) -> Result<TabId, TabError> {
        let initial = match url {
            Some(url) => InitialContent::Url(url),
            None => {
                let slot = match self.initial_slot {
                    InitialSlot::Omitted => ImageSlot::Omitted,
                    InitialSlot::Loading => ImageSlot::Loading,
                };
                InitialContent::Placeholder(self.placeholder.render(slot))
            }
        };
        self.open(initial)
    }

    /// Opens a new active tab rendering an inline document.
    fn open_document(&mut self, html: &str) -> Result<TabId, TabError> {
        self.open(InitialContent::Document(html.to_string()))
    }

    /// Closes a tab immediately. If it was active, its right-hand neighbour
    /// (or the new last tab) becomes active.
    fn close_tab(&mut self, tab_id: &TabId) -> Result<TabCloseOutcome, TabError> {
        let index = self
            .find_tab_index(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.clone()))?;

        let mut tab = self.tabs.remove(index);
        tab.close();
        debug!("closed tab {}", tab_id);

        if self.tabs.is_empty() {
            self.active_tab_id = None;
            return Ok(TabCloseOutcome::LastTabClosed);
        }

        if self.active_tab_id.as_ref() == Some(tab_id) {
            let next = index.min(self.tabs.len() - 1);
            self.active_tab_id = Some(self.tabs[next].id().clone());
        }
        Ok(TabCloseOutcome::Remaining(self.tabs.len()))
    }

    fn switch_tab(&mut self, tab_id: &TabId) -> Result<(), TabError> {
        if self.find_tab_index(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id.clone()));
        }
        self.active_tab_id = Some(tab_id.clone());
        Ok(())
    }

    /// Closes every tab and refuses new ones afterwards.
    fn close_all(&mut self) {
        for tab in self.tabs.iter_mut() {
            tab.close();
        }
        if !self.tabs.is_empty() {
            info!("closing {} tab(s)", self.tabs.len());
        }
        self.tabs.clear();
        self.active_tab_id = None;
        self.closed = true;
    }

    fn get_tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == tab_id)
    }

    fn get_tab_mut(&mut self, tab_id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id() == tab_id)
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_ref()
            .and_then(|id| self.get_tab(id))
    }

    fn get_all_tabs(&self) -> Vec<TabSummary> {
        self.tabs.iter().map(Tab::summary).collect()
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// The "more options" menu offered next to each address bar.
    fn menu_actions(&self) -> &'static [MenuAction] {
        &MenuAction::ALL
    }
}
