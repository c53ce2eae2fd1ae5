use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::services::decorative_image::DecorativeImage;
use crate::types::errors::ImageError;
use crate::types::tab::TabId;

/// Events delivered to the browser shell on its single execution context.
#[derive(Debug, Clone)]
pub enum ShellEvent {
    /// The page in `tab` reported a new document title.
    TitleChanged { tab: TabId, title: String },
    /// The page in `tab` committed a navigation to `url`.
    UrlChanged { tab: TabId, url: String },
    /// A background decorative image fetch for `tab` completed.
    DecorativeImageReady {
        tab: TabId,
        image: Result<DecorativeImage, ImageError>,
    },
    /// The engine finished (or gave up on) a download it was told to accept.
    DownloadFinished {
        url: String,
        path: Option<PathBuf>,
        success: bool,
    },
}

/// Posts events back onto the shell's execution context. Callable from any thread.
pub trait EventSink: Send + Sync {
    fn post(&self, event: ShellEvent);
}

impl EventSink for UnboundedSender<ShellEvent> {
    fn post(&self, event: ShellEvent) {
        if self.send(event).is_err() {
            debug!("event dropped, receiver is gone");
        }
    }
}

/// Creates a queue-backed sink and the receiver the shell drains.
pub fn event_channel() -> (Arc<dyn EventSink>, UnboundedReceiver<ShellEvent>) {
    let (tx, rx) = unbounded_channel();
    (Arc::new(tx), rx)
}
