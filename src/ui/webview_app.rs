//! WebView-based browser window using `wry` + `tao`.
//!
//! Architecture:
//! - One window, one webview. Tabs share the webview: the active tab's page is
//!   shown, and switching tabs reloads the newly active tab's last document.
//! - `with_initialization_script(TOOLBAR_JS)` injects the tab strip, address
//!   bar and "more options" menu on every page, including inline `data:` pages.
//! - IPC from JS → Rust via `window.ipc.postMessage()`.
//! - Every callback only posts a `UserEvent`; all shell state changes happen
//!   inside the event loop, one event at a time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use log::{debug, error, info, warn};
use serde::Deserialize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::WindowBuilder;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::app::{BrowserShell, CloseOutcome, ShellParts, ViewerCommand};
use crate::host::dialog::SaveDialog;
use crate::host::engine::{PageSession, WebEngine};
use crate::host::events::{EventSink, ShellEvent};
use crate::managers::tab_host::TabHostTrait;
use crate::services::decorative_image::ImageFetcher;
use crate::services::placeholder_page::{is_reserved_document_url, to_document_url};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::download::DownloadDecision;
use crate::types::errors::{ShellError, ViewerError};
use crate::types::settings::BrowserSettings;
use crate::types::tab::{MenuAction, TabId};

#[derive(Debug)]
enum UserEvent {
    /// Raw IPC message from the toolbar or a viewer page, with the URI of
    /// the page that posted it.
    Ipc { origin: String, body: String },
    /// A tab's page session asked for `url` to be shown.
    Load { tab: TabId, url: String },
    /// A tab's page session was torn down.
    SessionClosed(TabId),
    /// The webview finished loading `url`.
    PageLoaded(String),
    /// The webview's document title changed.
    TitleChanged(String),
    /// Event for the shell from a background task or the engine.
    Shell(ShellEvent),
}

const TOOLBAR_JS: &str = r#"
(function(){
  if (window.__mb_toolbar) return;
  window.__mb_toolbar = true;
  function send(cmd, extra){
    var msg = Object.assign({cmd: cmd}, extra || {});
    if (window.ipc) window.ipc.postMessage(JSON.stringify(msg));
  }
  function mount(){
    var bar = document.createElement('div');
    bar.id = '__mb_bar';
    bar.style.cssText = 'position:fixed;top:0;left:0;right:0;z-index:2147483647;background:#2b2b2b;'
      + 'color:#eee;font:13px -apple-system,"Segoe UI",Helvetica,Arial,sans-serif;border-bottom:1px solid #444';
    bar.innerHTML = '<div id="__mb_tabs" style="display:flex;gap:2px;padding:4px 4px 0"></div>'
      + '<div style="display:flex;gap:6px;padding:4px">'
      + '<input id="__mb_addr" style="flex:1;background:#1e1e1e;color:#eee;border:1px solid #555;border-radius:4px;padding:4px 8px" spellcheck="false">'
      + '<button id="__mb_more" title="More options" style="background:#333;color:#eee;border:1px solid #555;border-radius:4px">&#8942;</button>'
      + '<div id="__mb_menu" style="display:none;position:absolute;right:4px;top:64px;background:#333;border:1px solid #555;border-radius:4px"></div>'
      + '</div>';
    document.documentElement.appendChild(bar);
    if (document.body) document.body.style.marginTop = '72px';
    var addr = document.getElementById('__mb_addr');
    addr.addEventListener('keydown', function(e){
      if (e.key === 'Enter') send('submit', {text: addr.value});
    });
    var menu = document.getElementById('__mb_menu');
    document.getElementById('__mb_more').addEventListener('click', function(){
      menu.style.display = menu.style.display === 'none' ? 'block' : 'none';
    });
    send('ui_ready');
  }
  window.__mb_updateTabs = function(state){
    var strip = document.getElementById('__mb_tabs');
    if (!strip) return;
    strip.innerHTML = '';
    state.tabs.forEach(function(t){
      var tab = document.createElement('div');
      tab.style.cssText = 'display:flex;gap:6px;align-items:center;padding:4px 8px;max-width:200px;cursor:default;'
        + 'border-radius:4px 4px 0 0;background:' + (t.id === state.active ? '#444' : '#333');
      var label = document.createElement('span');
      label.textContent = t.label;
      label.style.cssText = 'overflow:hidden;text-overflow:ellipsis;white-space:nowrap';
      label.addEventListener('click', function(){ send('switch_tab', {id: t.id}); });
      var close = document.createElement('span');
      close.textContent = '×';
      close.addEventListener('click', function(e){ e.stopPropagation(); send('close_tab', {id: t.id}); });
      tab.appendChild(label);
      tab.appendChild(close);
      strip.appendChild(tab);
    });
    var plus = document.createElement('div');
    plus.textContent = '+';
    plus.style.cssText = 'padding:4px 10px;cursor:default';
    plus.addEventListener('click', function(){ send('new_tab'); });
    strip.appendChild(plus);
    var addr = document.getElementById('__mb_addr');
    if (addr && document.activeElement !== addr) {
      addr.value = state.address;
      addr.setSelectionRange(0, 0);
    }
    var menu = document.getElementById('__mb_menu');
    if (menu) {
      menu.innerHTML = '';
      state.menu.forEach(function(m){
        var item = document.createElement('div');
        item.textContent = m.label;
        item.style.cssText = 'padding:6px 12px;cursor:default;white-space:nowrap';
        item.addEventListener('click', function(){ menu.style.display = 'none'; send('menu', {action: m.action}); });
        menu.appendChild(item);
      });
    }
  };
  if (document.readyState === 'loading') document.addEventListener('DOMContentLoaded', mount);
  else mount();
})();
"#;

/// Message posted by the toolbar and viewer pages.
#[derive(Debug, Deserialize)]
struct IpcMessage {
    cmd: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    action: Option<MenuAction>,
    #[serde(default)]
    index: Option<usize>,
}

impl IpcMessage {
    fn viewer_command(&self) -> Option<ViewerCommand> {
        match (self.cmd.as_str(), self.index) {
            ("delete_visit", Some(row)) => Some(ViewerCommand::DeleteVisit(row)),
            ("clear_visits", _) => Some(ViewerCommand::ClearVisits),
            ("delete_download", Some(row)) => Some(ViewerCommand::DeleteDownload(row)),
            ("delete_download_file", Some(row)) => Some(ViewerCommand::DeleteDownloadFile(row)),
            ("clear_downloads", _) => Some(ViewerCommand::ClearDownloads),
            _ => None,
        }
    }
}

// ─── Host collaborators ───

/// Posts shell events onto the tao event loop.
struct ProxySink(Mutex<EventLoopProxy<UserEvent>>);

impl EventSink for ProxySink {
    fn post(&self, event: ShellEvent) {
        match self.0.lock() {
            Ok(proxy) => {
                if proxy.send_event(UserEvent::Shell(event)).is_err() {
                    debug!("event loop is gone, event dropped");
                }
            }
            Err(_) => warn!("event proxy lock poisoned"),
        }
    }
}

/// Engine whose sessions forward loads to the shared webview.
struct WebViewEngine {
    proxy: EventLoopProxy<UserEvent>,
}

impl WebEngine for WebViewEngine {
    fn create_session(&mut self, tab: &TabId) -> Box<dyn PageSession> {
        Box::new(WebViewSession {
            tab: tab.clone(),
            proxy: self.proxy.clone(),
            closed: false,
        })
    }
}

struct WebViewSession {
    tab: TabId,
    proxy: EventLoopProxy<UserEvent>,
    closed: bool,
}

impl WebViewSession {
    fn send(&self, event: UserEvent) {
        if self.proxy.send_event(event).is_err() {
            debug!("event loop is gone, load for tab {} dropped", self.tab);
        }
    }
}

impl PageSession for WebViewSession {
    fn load_url(&mut self, url: &str) {
        if self.closed {
            return;
        }
        self.send(UserEvent::Load {
            tab: self.tab.clone(),
            url: url.to_string(),
        });
    }

    fn load_html(&mut self, html: &str) {
        if self.closed {
            return;
        }
        self.send(UserEvent::Load {
            tab: self.tab.clone(),
            url: to_document_url(html),
        });
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.send(UserEvent::SessionClosed(self.tab.clone()));
        }
    }
}

/// Native "save as" dialog.
struct NativeSaveDialog;

impl SaveDialog for NativeSaveDialog {
    fn prompt_save_path(&self, suggested: &Path) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title("Save download");
        if let Some(dir) = suggested.parent().filter(|d| !d.as_os_str().is_empty()) {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = suggested.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        dialog.save_file()
    }
}

fn show_message(level: rfd::MessageLevel, text: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(level)
        .set_title("MiniBrowser")
        .set_description(text)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn show_fatal(err: &ShellError) {
    error!("fatal: {}", err);
    show_message(rfd::MessageLevel::Error, &err.to_string());
}

// ─── Event handling ───

enum Flow {
    Continue,
    Exit,
}

struct WindowState {
    shell: Rc<RefCell<BrowserShell>>,
    /// Last document requested by each tab.
    pages: HashMap<TabId, String>,
    /// The next page load re-displays a tab after a switch and is not a new visit.
    restoring: bool,
}

impl WindowState {
    fn active_tab(&self) -> Option<TabId> {
        self.shell.borrow().tabs().active_tab_id().cloned()
    }

    fn handle(&mut self, event: UserEvent, webview: &WebView) -> Result<Flow, ShellError> {
        match event {
            UserEvent::Ipc { origin, body } => return self.handle_ipc(&origin, &body, webview),
            UserEvent::Load { tab, url } => {
                let is_active = self.active_tab().as_ref() == Some(&tab);
                self.pages.insert(tab, url.clone());
                if is_active {
                    self.restoring = false;
                    if let Err(e) = webview.load_url(&url) {
                        warn!("webview load failed: {}", e);
                    }
                }
            }
            UserEvent::SessionClosed(tab) => {
                self.pages.remove(&tab);
            }
            UserEvent::PageLoaded(url) => {
                let active = self.active_tab();
                match page_owner(&self.pages, active.as_ref(), &url) {
                    Some(tab) if Some(&tab) != active.as_ref() => {
                        debug!("late load of {} credited to tab {}", url, tab);
                        self.shell
                            .borrow_mut()
                            .dispatch(ShellEvent::UrlChanged { tab, url })?;
                    }
                    _ if std::mem::take(&mut self.restoring) => debug!("restored {}", url),
                    _ => {
                        if let Some(tab) = active {
                            self.shell
                                .borrow_mut()
                                .dispatch(ShellEvent::UrlChanged { tab, url })?;
                        }
                    }
                }
            }
            UserEvent::TitleChanged(title) => {
                if let Some(tab) = self.active_tab() {
                    self.shell
                        .borrow_mut()
                        .dispatch(ShellEvent::TitleChanged { tab, title })?;
                }
            }
            UserEvent::Shell(event) => self.shell.borrow_mut().dispatch(event)?,
        }
        Ok(Flow::Continue)
    }

    fn handle_ipc(&mut self, origin: &str, body: &str, webview: &WebView) -> Result<Flow, ShellError> {
        let msg: IpcMessage = match serde_json::from_str(body) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("ignoring malformed IPC message: {}", e);
                return Ok(Flow::Continue);
            }
        };
        debug!("[IPC] {}", msg.cmd);

        let Some(active) = self.active_tab() else {
            return Ok(Flow::Continue);
        };
        if let Some(cmd) = msg.viewer_command() {
            let page = webview.url().unwrap_or_default();
            if !is_viewer_origin(origin, &page) {
                warn!("dropping {} from non-viewer page {}", msg.cmd, origin);
                return Ok(Flow::Continue);
            }
            return match self.shell.borrow_mut().apply_viewer_command(&active, cmd) {
                Err(ShellError::Viewer(e @ ViewerError::FileDeletion { .. })) => {
                    show_message(rfd::MessageLevel::Warning, &e.to_string());
                    Ok(Flow::Continue)
                }
                other => other.map(|_| Flow::Continue),
            };
        }

        match msg.cmd.as_str() {
            "ui_ready" => {}
            "new_tab" => {
                self.shell.borrow_mut().new_tab(None)?;
            }
            "close_tab" => {
                let tab = msg.id.as_deref().map(TabId::from).unwrap_or(active);
                let outcome = self.shell.borrow_mut().close_tab(&tab)?;
                if outcome == CloseOutcome::WindowClosed {
                    return Ok(Flow::Exit);
                }
                self.restore_active(webview);
            }
            "switch_tab" => {
                if let Some(id) = msg.id.as_deref() {
                    self.shell.borrow_mut().switch_tab(&TabId::from(id))?;
                    self.restore_active(webview);
                }
            }
            "submit" => {
                let text = msg.text.unwrap_or_default();
                self.shell.borrow_mut().navigate_from_input(&active, &text)?;
            }
            "menu" => {
                if let Some(action) = msg.action {
                    self.shell.borrow_mut().open_viewer_tab(action)?;
                }
            }
            other => debug!("unknown IPC command: {}", other),
        }
        Ok(Flow::Continue)
    }

    /// Shows the active tab's last document in the shared webview.
    fn restore_active(&mut self, webview: &WebView) {
        let Some(url) = self.active_tab().and_then(|t| self.pages.get(&t).cloned()) else {
            return;
        };
        self.restoring = true;
        if let Err(e) = webview.load_url(&url) {
            warn!("webview load failed: {}", e);
            self.restoring = false;
        }
    }

    fn toolbar_update(&self) -> String {
        let shell = self.shell.borrow();
        let tabs: Vec<serde_json::Value> = shell
            .tabs()
            .get_all_tabs()
            .into_iter()
            .map(|t| serde_json::json!({ "id": t.id, "label": t.label }))
            .collect();
        let active = shell.tabs().get_active_tab();
        let menu: Vec<serde_json::Value> = shell
            .menu_actions()
            .iter()
            .map(|a| serde_json::json!({ "action": a, "label": a.label() }))
            .collect();
        let state = serde_json::json!({
            "tabs": tabs,
            "active": active.map(|t| t.id().as_str()),
            "address": active.map(|t| t.address_bar().text()).unwrap_or_default(),
            "menu": menu,
        });
        format!("if(window.__mb_updateTabs)__mb_updateTabs({})", state)
    }
}

/// The tab that requested `url`, preferring the active tab when several did.
fn page_owner(pages: &HashMap<TabId, String>, active: Option<&TabId>, url: &str) -> Option<TabId> {
    if let Some(tab) = active.filter(|t| pages.get(*t).map(String::as_str) == Some(url)) {
        return Some(tab.clone());
    }
    pages
        .iter()
        .find(|(_, page)| page.as_str() == url)
        .map(|(tab, _)| tab.clone())
}

/// Viewer commands are only accepted from inline documents. `origin` is the
/// IPC request URI; some engines leave it empty, so the webview's current
/// page decides then.
fn is_viewer_origin(origin: &str, page: &str) -> bool {
    if origin.is_empty() {
        is_reserved_document_url(page)
    } else {
        is_reserved_document_url(origin)
    }
}

// ─── Main entry point ───

fn load_settings() -> BrowserSettings {
    let mut engine = SettingsEngine::new(None);
    match engine.load() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("using default settings: {}", e);
            BrowserSettings::default()
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let settings = load_settings();

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let storage = match BrowserShell::open_file_storage(&settings) {
        Ok(storage) => storage,
        Err(e) => {
            show_fatal(&e);
            return Err(e.into());
        }
    };
    let parts = ShellParts {
        engine: Box::new(WebViewEngine {
            proxy: proxy.clone(),
        }),
        storage: Box::new(storage),
        dialog: Box::new(NativeSaveDialog),
        events: Arc::new(ProxySink(Mutex::new(proxy.clone()))),
        images: ImageFetcher::from_settings(&settings.decorative_image),
    };
    let shell = Rc::new(RefCell::new(BrowserShell::new(settings.clone(), parts)));
    if let Err(e) = shell.borrow_mut().startup() {
        show_fatal(&e);
        return Err(e.into());
    }

    let window = WindowBuilder::new()
        .with_title(&settings.window.title)
        .with_inner_size(tao::dpi::LogicalSize::new(
            settings.window.width,
            settings.window.height,
        ))
        .build(&event_loop)?;

    let ipc_proxy = proxy.clone();
    let load_proxy = proxy.clone();
    let title_proxy = proxy.clone();
    let download_proxy = proxy.clone();
    let download_shell = Rc::clone(&shell);

    let builder = WebViewBuilder::new()
        .with_initialization_script(TOOLBAR_JS)
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let _ = ipc_proxy.send_event(UserEvent::Ipc {
                origin: msg.uri().to_string(),
                body: msg.body().clone(),
            });
        })
        .with_on_page_load_handler(move |event, url| {
            if let PageLoadEvent::Finished = event {
                let _ = load_proxy.send_event(UserEvent::PageLoaded(url));
            }
        })
        .with_document_title_changed_handler(move |title| {
            let _ = title_proxy.send_event(UserEvent::TitleChanged(title));
        })
        .with_download_started_handler(move |url: String, path: &mut PathBuf| -> bool {
            let Ok(mut shell) = download_shell.try_borrow_mut() else {
                warn!("download of {} refused, shell busy", url);
                return false;
            };
            match shell.handle_download_requested(&url, path.as_path()) {
                DownloadDecision::Accepted(final_path) => {
                    *path = final_path;
                    true
                }
                DownloadDecision::Rejected => false,
            }
        })
        .with_download_completed_handler(move |url, path, success| {
            let _ = download_proxy.send_event(UserEvent::Shell(ShellEvent::DownloadFinished {
                url,
                path,
                success,
            }));
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().ok_or("failed to get GTK vbox")?;
        builder.build_gtk(vbox)?
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window)?;

    let mut state = WindowState {
        shell,
        pages: HashMap::new(),
        restoring: false,
    };
    info!("window ready");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if let Err(e) = state.shell.borrow_mut().shutdown() {
                    show_fatal(&e);
                }
                *control_flow = ControlFlow::Exit;
            }

            Event::UserEvent(user_event) => match state.handle(user_event, &webview) {
                Ok(Flow::Continue) => {
                    let script = state.toolbar_update();
                    if let Err(e) = webview.evaluate_script(&script) {
                        debug!("toolbar update failed: {}", e);
                    }
                }
                Ok(Flow::Exit) => *control_flow = ControlFlow::Exit,
                Err(e) => {
                    show_fatal(&e);
                    let _ = state.shell.borrow_mut().shutdown();
                    *control_flow = ControlFlow::Exit;
                }
            },

            _ => {}
        }
    });
}
