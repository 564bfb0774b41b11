//! Capabilities the shell consumes from the outside world
//!
//! The controller only talks to these traits, so the terminal front end, the HTTP
//! client and the test doubles are interchangeable.

use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use super::types::VersionInfo;
use crate::error::ServiceError;

/// Session-level calls against the agent
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Fetch the agent's version document
    async fn fetch_info(&self) -> Result<VersionInfo, ServiceError>;

    /// End the current session
    async fn logout(&self) -> Result<(), ServiceError>;

    /// Ask the agent to reload its configuration; returns the elapsed-time description
    async fn reload_config(&self) -> Result<String, ServiceError>;
}

/// Configuration-section calls used by the content views and the import dialog
#[async_trait]
pub trait ConfigService: Send + Sync {
    /// List the entries of a configuration section
    async fn list_entries(&self, path: &str) -> Result<Vec<Value>, ServiceError>;

    /// Import a configuration document; returns the agent's summary text
    async fn import_config(&self, document: Value, overwrite: bool)
    -> Result<String, ServiceError>;
}

/// Everything the shell needs from the agent
pub trait AgentApi: SessionService + ConfigService {}

impl<T: SessionService + ConfigService + ?Sized> AgentApi for T {}

/// Leaves the shell for the sign-in destination
pub trait Navigator: Send + Sync {
    fn go_to_sign_in(&self);
}

/// Synchronous, user-visible error surface
pub trait AlertSink: Send + Sync {
    fn show(&self, message: &str);
}

/// Background diagnostic trail
pub trait LogSink: Send + Sync {
    fn record(&self, message: &str);
}

/// Opens external links
pub trait Opener: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// The runtime status view, notified before a reload starts
pub trait RuntimeObserver: Send + Sync {
    fn refresh_status(&self);
}

/// [`LogSink`] backed by `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn record(&self, message: &str) {
        error!(target: "collector_console::shell", "{}", message);
    }
}

/// [`Opener`] using the platform's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}
