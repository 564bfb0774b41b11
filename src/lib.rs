//! Collector Console - terminal administration console for the performance collector agent
//!
//! This crate provides the navigation shell of the agent's admin UI: a side menu,
//! a content panel whose views are resolved at runtime, a blocking overlay for
//! long operations and the session actions (about, import, reload, logout).
//!
//! # Architecture
//!
//! The shell state lives in a single [`shell::ShellController`] owned by the TUI
//! event loop. Calls against the agent run as spawned tasks and report back as
//! settlements, which the event loop applies in order.
//!
//! # Modules
//!
//! - [`shell`] - Menu, view selection, blocking overlay, dialogs and the controller
//! - [`service`] - HTTP client for the agent API
//! - [`views`] - Console menu layout and content views
//! - [`tui`] - Event-driven terminal UI with ratatui
//! - [`config`] - Layered configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod service;
pub mod shell;
pub mod tui;
pub mod views;

pub use config::Config;
pub use error::{Error, Result};
pub use service::HttpSessionService;
pub use shell::{ShellController, VersionInfo};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
