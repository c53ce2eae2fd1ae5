//! MiniBrowser UI layer.
//!
//! Uses `wry` for cross-platform WebView rendering and `tao` for the window
//! and event loop. The tab strip and address bar are injected into every
//! page as a small toolbar script and talk to Rust over wry IPC.

pub mod webview_app;
