//! Core shell types
//!
//! Metadata the shell keeps about the agent it administers:
//! - `VersionInfo` is the agent's build/version document
//! - `SessionInfo` is what the shell learned at startup
//! - `ReloadResult` is the outcome of the last successful configuration reload

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Version and build metadata reported by the agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    /// Instance identifier of the running agent
    #[serde(rename = "InstanceID")]
    pub instance_id: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Commit")]
    pub commit: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "BuildStamp")]
    pub build_stamp: String,
}

impl VersionInfo {
    /// Short label for status bars, e.g. `v0.9.1 (abc1234)`
    pub fn short_label(&self) -> String {
        if self.commit.is_empty() {
            format!("v{}", self.version)
        } else {
            let commit: String = self.commit.chars().take(7).collect();
            format!("v{} ({})", self.version, commit)
        }
    }
}

/// Session metadata fetched once when the shell starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    /// Agent version, unset until the startup fetch succeeds
    pub version: Option<VersionInfo>,
    /// Whether the startup fetch succeeded
    pub signed_in: bool,
}

impl SessionInfo {
    /// Record a successful startup fetch
    pub fn populate(&mut self, version: VersionInfo) {
        self.version = Some(version);
        self.signed_in = true;
    }
}

/// Outcome of a successful configuration reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadResult {
    /// When the reload settled
    pub timestamp: DateTime<Utc>,
    /// Elapsed-time description returned by the agent (e.g. "3.2s")
    pub elapsed_description: String,
}

impl ReloadResult {
    pub fn new(elapsed_description: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            elapsed_description: elapsed_description.into(),
        }
    }
}

impl fmt::Display for ReloadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local: DateTime<Local> = self.timestamp.into();
        write!(
            f,
            "{} (took {})",
            local.format("%Y-%m-%d %H:%M:%S"),
            self.elapsed_description
        )
    }
}
