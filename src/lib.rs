//! MiniBrowser: a minimal tabbed web browser shell with persistent browsing
//! and download history.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod host;
pub mod managers;
pub mod platform;
pub mod services;
pub mod storage;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
