//! Browser shell for MiniBrowser.
//!
//! Central struct owning the tab host and the history store, wiring engine
//! events to them and managing the application lifecycle explicitly:
//! `startup()` loads history and opens the first tab, `shutdown()` saves
//! history and tears the tabs down.

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::host::dialog::SaveDialog;
use crate::host::engine::WebEngine;
use crate::host::events::{EventSink, ShellEvent};
use crate::managers::download_viewer::DownloadViewer;
use crate::managers::history_store::{HistoryStore, HistoryStoreTrait};
use crate::managers::history_viewer::HistoryViewer;
use crate::managers::tab::{Tab, UrlChange};
use crate::managers::tab_host::{InitialSlot, TabHost, TabHostTrait};
use crate::platform;
use crate::services::decorative_image::ImageFetcher;
use crate::services::download_naming::{final_download_path, suggested_file_name};
use crate::services::navigation_resolver::NavigationResolver;
use crate::services::placeholder_page::{is_reserved_document_url, ImageSlot, PlaceholderPage};
use crate::storage::{FileStorage, RecordStorage};
use crate::types::download::DownloadDecision;
use crate::types::errors::{ShellError, TabError, ViewerError};
use crate::types::navigation::NavigationTarget;
use crate::types::settings::BrowserSettings;
use crate::types::tab::{MenuAction, TabCloseOutcome, TabId};

/// Lifecycle state of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Created,
    Running,
    ShutDown,
}

/// What happened to the window after a tab closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    TabClosed { remaining: usize },
    /// The last tab closed; history was saved and the shell shut down.
    WindowClosed,
}

/// Which viewer a menu action opens.
pub type ViewerKind = MenuAction;

/// An action triggered from inside a viewer page, addressed by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    DeleteVisit(usize),
    ClearVisits,
    DeleteDownload(usize),
    DeleteDownloadFile(usize),
    ClearDownloads,
}

impl ViewerCommand {
    /// The viewer this command belongs to.
    pub fn viewer(&self) -> ViewerKind {
        match self {
            Self::DeleteVisit(_) | Self::ClearVisits => MenuAction::OpenHistoryViewer,
            _ => MenuAction::OpenDownloadViewer,
        }
    }
}

/// Host collaborators the shell is built from.
pub struct ShellParts {
    pub engine: Box<dyn WebEngine>,
    pub storage: Box<dyn RecordStorage>,
    pub dialog: Box<dyn SaveDialog>,
    pub events: Arc<dyn EventSink>,
    pub images: ImageFetcher,
}

/// Top-level controller: tabs, history, downloads, viewers.
pub struct BrowserShell {
    settings: BrowserSettings,
    history: Rc<RefCell<HistoryStore>>,
    tab_host: TabHost,
    resolver: NavigationResolver,
    dialog: Box<dyn SaveDialog>,
    events: Arc<dyn EventSink>,
    images: ImageFetcher,
    /// Final paths of accepted downloads that have not finished yet, in
    /// request order per source URL.
    pending_downloads: HashMap<String, Vec<PathBuf>>,
    /// Tabs currently showing a viewer document, and which viewer.
    viewer_tabs: HashMap<TabId, ViewerKind>,
    state: ShellState,
}

impl BrowserShell {
    /// Builds the shell and registers its observers on every future tab.
    pub fn new(settings: BrowserSettings, parts: ShellParts) -> Self {
        let history = Rc::new(RefCell::new(HistoryStore::with_settings(
            parts.storage,
            &settings.storage,
        )));

        let mut tab_host = TabHost::new(parts.engine, PlaceholderPage::default());
        if parts.images.is_enabled() {
            tab_host.set_initial_slot(InitialSlot::Loading);
        }

        let store = Rc::clone(&history);
        tab_host.on_tab_created(move |tab: &mut Tab| {
            let store = Rc::clone(&store);
            tab.on_url_changed(move |change: &UrlChange<'_>| {
                debug!(
                    "tab {} at {} (user: {})",
                    change.tab, change.url, change.user_initiated
                );
                store.borrow_mut().record_visit(change.url).map(|_| ())
            });
            tab.on_title_changed(|tab, label| debug!("tab {} titled '{}'", tab, label));
        });

        Self {
            resolver: NavigationResolver::from_settings(&settings.navigation),
            settings,
            history,
            tab_host,
            dialog: parts.dialog,
            events: parts.events,
            images: parts.images,
            pending_downloads: HashMap::new(),
            viewer_tabs: HashMap::new(),
            state: ShellState::Created,
        }
    }

    /// Opens file storage in the configured (or platform) data directory.
    pub fn open_file_storage(settings: &BrowserSettings) -> Result<FileStorage, ShellError> {
        let dir = platform::resolve_data_dir(settings.storage.data_dir.as_deref());
        Ok(FileStorage::open(dir)?)
    }

    /// Startup sequence: load both history logs, then open the initial
    /// placeholder tab. Storage failures abort startup.
    pub fn startup(&mut self) -> Result<TabId, ShellError> {
        if self.state == ShellState::ShutDown {
            return Err(ShellError::ShutDown);
        }
        self.history.borrow_mut().load().map_err(|e| {
            error!("failed to load history: {}", e);
            e
        })?;
        self.state = ShellState::Running;
        let tab = self.new_tab(None)?;
        info!("browser started");
        Ok(tab)
    }

    /// Shutdown sequence: save both logs, then close every tab. Runs once;
    /// later calls do nothing.
    pub fn shutdown(&mut self) -> Result<(), ShellError> {
        if self.state == ShellState::ShutDown {
            return Ok(());
        }
        let saved = self.history.borrow().save();
        self.tab_host.close_all();
        self.viewer_tabs.clear();
        self.pending_downloads.clear();
        self.state = ShellState::ShutDown;
        saved.map_err(|e| {
            error!("failed to save history on shutdown: {}", e);
            e
        })?;
        info!("browser shut down");
        Ok(())
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn is_shut_down(&self) -> bool {
        self.state == ShellState::ShutDown
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    pub fn tabs(&self) -> &TabHost {
        &self.tab_host
    }

    pub fn resolver(&self) -> &NavigationResolver {
        &self.resolver
    }

    /// Exclusive handle to the history store.
    pub fn history(&mut self) -> RefMut<'_, HistoryStore> {
        self.history.borrow_mut()
    }

    /// Opens a tab; without a URL it shows the placeholder page and a
    /// decorative image is requested in the background.
    pub fn new_tab(&mut self, url: Option<&str>) -> Result<TabId, ShellError> {
        if self.state != ShellState::Running {
            return Err(ShellError::ShutDown);
        }
        let id = self.tab_host.create_tab(url)?;
        if url.is_none() && self.images.is_enabled() {
            self.images.request(id.clone(), Arc::clone(&self.events));
        }
        Ok(id)
    }

    /// Closes a tab. Closing the last one shuts the shell down.
    pub fn close_tab(&mut self, tab: &TabId) -> Result<CloseOutcome, ShellError> {
        let outcome = self.tab_host.close_tab(tab)?;
        self.viewer_tabs.remove(tab);
        match outcome {
            TabCloseOutcome::Remaining(remaining) => Ok(CloseOutcome::TabClosed { remaining }),
            TabCloseOutcome::LastTabClosed => {
                self.shutdown()?;
                Ok(CloseOutcome::WindowClosed)
            }
        }
    }

    pub fn switch_tab(&mut self, tab: &TabId) -> Result<(), ShellError> {
        Ok(self.tab_host.switch_tab(tab)?)
    }

    fn tab_mut(&mut self, tab: &TabId) -> Result<&mut Tab, ShellError> {
        self.tab_host
            .get_tab_mut(tab)
            .ok_or_else(|| TabError::NotFound(tab.clone()).into())
    }

    /// Replaces a tab's address-bar text (user typing).
    pub fn set_address_text(&mut self, tab: &TabId, text: &str) -> Result<(), ShellError> {
        self.tab_mut(tab)?.set_address_text(text);
        Ok(())
    }

    /// Enter pressed in a tab's address bar.
    pub fn submit_address(&mut self, tab: &TabId) -> Result<Option<NavigationTarget>, ShellError> {
        let target = self
            .tab_host
            .get_tab_mut(tab)
            .ok_or_else(|| TabError::NotFound(tab.clone()))?
            .submit(&self.resolver);
        if target.is_some() {
            self.viewer_tabs.remove(tab);
        }
        Ok(target)
    }

    /// Types `text` into the address bar and submits it.
    pub fn navigate_from_input(
        &mut self,
        tab: &TabId,
        text: &str,
    ) -> Result<Option<NavigationTarget>, ShellError> {
        self.set_address_text(tab, text)?;
        self.submit_address(tab)
    }

    /// Handles one event from the engine or a background task. Events for
    /// tabs that have since closed are dropped.
    pub fn dispatch(&mut self, event: ShellEvent) -> Result<(), ShellError> {
        if self.state == ShellState::ShutDown {
            debug!("event after shutdown dropped: {:?}", event);
            return Ok(());
        }
        match event {
            ShellEvent::TitleChanged { tab, title } => {
                if let Some(t) = self.tab_host.get_tab_mut(&tab) {
                    t.handle_title_changed(&title);
                }
                Ok(())
            }
            ShellEvent::UrlChanged { tab, url } => {
                if !is_reserved_document_url(&url) && self.viewer_tabs.remove(&tab).is_some() {
                    debug!("tab {} left its viewer for {}", tab, url);
                }
                match self.tab_host.get_tab_mut(&tab) {
                    Some(t) => Ok(t.handle_url_changed(&url)?),
                    None => Ok(()),
                }
            }
            ShellEvent::DecorativeImageReady { tab, image } => {
                let html = match &image {
                    Ok(img) => self.tab_host.placeholder().render(ImageSlot::Ready(img)),
                    Err(e) => {
                        debug!("placeholder image unavailable: {}", e);
                        self.tab_host.placeholder().render(ImageSlot::Failed)
                    }
                };
                if let Some(t) = self.tab_host.get_tab_mut(&tab) {
                    if t.is_showing_placeholder() {
                        t.show_placeholder(&html);
                    }
                }
                Ok(())
            }
            ShellEvent::DownloadFinished { url, path, success } => {
                self.handle_download_finished(&url, path, success)?;
                Ok(())
            }
        }
    }

    /// Drains every queued event. Returns how many were handled.
    pub fn pump(&mut self, rx: &mut UnboundedReceiver<ShellEvent>) -> Result<usize, ShellError> {
        let mut handled = 0;
        while let Ok(event) = rx.try_recv() {
            self.dispatch(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// The engine wants to download `url`. Prompts for a destination, makes
    /// sure the file carries the source extension, and tells the engine where
    /// to save. `suggested` is the engine's default path.
    pub fn handle_download_requested(&mut self, url: &str, suggested: &Path) -> DownloadDecision {
        let suggestion = match suggested.file_name() {
            Some(_) => suggested.to_path_buf(),
            None => suggested.join(suggested_file_name(url)),
        };
        let Some(chosen) = self.dialog.prompt_save_path(&suggestion) else {
            info!("download of {} cancelled", url);
            return DownloadDecision::Rejected;
        };
        let final_path = final_download_path(&chosen, url);
        debug!("downloading {} to {}", url, final_path.display());
        self.pending_downloads
            .entry(url.to_string())
            .or_default()
            .push(final_path.clone());
        DownloadDecision::Accepted(final_path)
    }

    /// Takes the planned path of an unfinished download of `url`: the one the
    /// engine reports if it was planned, otherwise the oldest.
    fn take_pending_download(&mut self, url: &str, reported: Option<&Path>) -> Option<PathBuf> {
        let planned = self.pending_downloads.get_mut(url)?;
        let index = match reported {
            Some(path) => planned.iter().position(|p| p == path)?,
            None => 0,
        };
        let taken = planned.remove(index);
        if planned.is_empty() {
            self.pending_downloads.remove(url);
        }
        Some(taken)
    }

    /// Number of accepted downloads still waiting to finish.
    pub fn pending_download_count(&self) -> usize {
        self.pending_downloads.values().map(Vec::len).sum()
    }

    /// The engine finished a download. Successful downloads are recorded and
    /// the download log is flushed before returning.
    pub fn handle_download_finished(
        &mut self,
        url: &str,
        path: Option<PathBuf>,
        success: bool,
    ) -> Result<Option<PathBuf>, ShellError> {
        let planned = self.take_pending_download(url, path.as_deref());
        if !success {
            warn!("download of {} failed", url);
            return Ok(None);
        }
        let Some(final_path) = path.or(planned) else {
            warn!("download of {} finished without a path", url);
            return Ok(None);
        };
        self.history
            .borrow_mut()
            .record_download(&final_path.to_string_lossy())?;
        info!("downloaded {}", final_path.display());
        Ok(Some(final_path))
    }

    /// The "more options" menu entries.
    pub fn menu_actions(&self) -> &'static [MenuAction] {
        self.tab_host.menu_actions()
    }

    pub fn show_history_viewer(&mut self) -> HistoryViewer<RefMut<'_, HistoryStore>> {
        HistoryViewer::new(self.history.borrow_mut())
    }

    pub fn show_download_history_viewer(&mut self) -> DownloadViewer<RefMut<'_, HistoryStore>> {
        DownloadViewer::new(self.history.borrow_mut())
    }

    /// Renders the viewer a menu action opens.
    pub fn render_viewer(&mut self, kind: ViewerKind) -> String {
        match kind {
            MenuAction::OpenHistoryViewer => self.show_history_viewer().render_html(),
            MenuAction::OpenDownloadViewer => self.show_download_history_viewer().render_html(),
        }
    }

    /// Opens a viewer in a new tab and returns that tab.
    pub fn open_viewer_tab(&mut self, kind: ViewerKind) -> Result<TabId, ShellError> {
        if self.state != ShellState::Running {
            return Err(ShellError::ShutDown);
        }
        let html = self.render_viewer(kind);
        let tab = self.tab_host.open_document(&html)?;
        self.viewer_tabs.insert(tab.clone(), kind);
        Ok(tab)
    }

    /// The viewer `tab` is showing, if any.
    pub fn viewer_kind(&self, tab: &TabId) -> Option<ViewerKind> {
        self.viewer_tabs.get(tab).copied()
    }

    /// Applies a viewer action and re-renders the viewer in `tab`. Only a tab
    /// opened by `open_viewer_tab` for the command's viewer, and not navigated
    /// away since, may issue it. The viewer is refreshed even when the action
    /// fails, so a file that could not be deleted stays listed.
    pub fn apply_viewer_command(&mut self, tab: &TabId, cmd: ViewerCommand) -> Result<(), ShellError> {
        if self.state != ShellState::Running {
            return Err(ShellError::ShutDown);
        }
        if self.viewer_kind(tab) != Some(cmd.viewer()) {
            warn!("refusing {:?} from tab {}", cmd, tab);
            return Err(ViewerError::NotAViewer(tab.clone()).into());
        }
        let outcome = match cmd {
            ViewerCommand::DeleteVisit(row) => self.show_history_viewer().delete(row).map(|_| ()),
            ViewerCommand::ClearVisits => self.show_history_viewer().clear_all(),
            ViewerCommand::DeleteDownload(row) => {
                self.show_download_history_viewer().remove_entry(row).map(|_| ())
            }
            ViewerCommand::DeleteDownloadFile(row) => {
                self.show_download_history_viewer().delete_file(row).map(|_| ())
            }
            ViewerCommand::ClearDownloads => self.show_download_history_viewer().clear_all(),
        };
        let html = self.render_viewer(cmd.viewer());
        self.tab_mut(tab)?.show_document(&html);
        Ok(outcome?)
    }
}
