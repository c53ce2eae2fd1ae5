//! In-process engine with no rendering.
//!
//! Every load is recorded in an [`EngineLog`] and answered with the same events
//! a real engine would emit (URL committed, then title), posted through the
//! event sink rather than delivered re-entrantly.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use log::debug;
use url::Url;

use super::engine::{PageSession, WebEngine};
use super::events::{EventSink, ShellEvent};
use crate::services::placeholder_page::to_document_url;
use crate::types::tab::TabId;

/// A call made into the headless engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    LoadUrl { tab: TabId, url: String },
    LoadHtml { tab: TabId, html: String },
    Close { tab: TabId },
}

/// Shared record of engine calls.
#[derive(Debug, Clone, Default)]
pub struct EngineLog(Rc<RefCell<Vec<EngineCall>>>);

impl EngineLog {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.borrow().clone()
    }

    /// URLs loaded into `tab`, in order.
    pub fn urls_loaded(&self, tab: &TabId) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                EngineCall::LoadUrl { tab: t, url } if t == tab => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Inline documents rendered into `tab`, in order.
    pub fn html_loaded(&self, tab: &TabId) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                EngineCall::LoadHtml { tab: t, html } if t == tab => Some(html.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self, tab: &TabId) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|call| matches!(call, EngineCall::Close { tab: t } if t == tab))
    }

    fn push(&self, call: EngineCall) {
        self.0.borrow_mut().push(call);
    }
}

/// Engine that records calls and echoes navigation events.
pub struct HeadlessEngine {
    sink: Arc<dyn EventSink>,
    log: EngineLog,
}

impl HeadlessEngine {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            log: EngineLog::default(),
        }
    }

    /// Handle to the call log; stays valid after the engine is boxed.
    pub fn log(&self) -> EngineLog {
        self.log.clone()
    }
}

impl WebEngine for HeadlessEngine {
    fn create_session(&mut self, tab: &TabId) -> Box<dyn PageSession> {
        Box::new(HeadlessSession {
            tab: tab.clone(),
            sink: Arc::clone(&self.sink),
            log: self.log.clone(),
            closed: false,
        })
    }
}

struct HeadlessSession {
    tab: TabId,
    sink: Arc<dyn EventSink>,
    log: EngineLog,
    closed: bool,
}

impl HeadlessSession {
    fn commit(&self, url: String, title: String) {
        self.sink.post(ShellEvent::UrlChanged {
            tab: self.tab.clone(),
            url,
        });
        self.sink.post(ShellEvent::TitleChanged {
            tab: self.tab.clone(),
            title,
        });
    }
}

impl PageSession for HeadlessSession {
    fn load_url(&mut self, url: &str) {
        if self.closed {
            debug!("load on closed session ignored: {}", url);
            return;
        }
        self.log.push(EngineCall::LoadUrl {
            tab: self.tab.clone(),
            url: url.to_string(),
        });
        let title = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        self.commit(url.to_string(), title);
    }

    fn load_html(&mut self, html: &str) {
        if self.closed {
            return;
        }
        self.log.push(EngineCall::LoadHtml {
            tab: self.tab.clone(),
            html: html.to_string(),
        });
        self.commit(to_document_url(html), document_title(html));
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.log.push(EngineCall::Close {
                tab: self.tab.clone(),
            });
        }
    }
}

fn document_title(html: &str) -> String {
    let Some(start) = html.find("<title>") else {
        return String::new();
    };
    let rest = &html[start + "<title>".len()..];
    rest.find("</title>")
        .map(|end| rest[..end].trim().to_string())
        .unwrap_or_default()
}
