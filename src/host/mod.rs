//! Boundary to the host environment.
//!
//! The browser shell never talks to a concrete web engine, dialog toolkit or
//! event loop directly. It drives the traits defined here; the `ui` module
//! implements them with wry, tao and rfd, and [`headless`] implements them
//! in-process for the console demo and the tests.

pub mod dialog;
pub mod engine;
pub mod events;
pub mod headless;

pub use dialog::{SaveDialog, ScriptedDialog};
pub use engine::{PageSession, WebEngine};
pub use events::{event_channel, EventSink, ShellEvent};
