//! Error types for collector-console
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for collector-console
#[derive(Error, Debug)]
pub enum Error {
    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Side menu errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("Menu group index {index} out of range (menu has {len} groups)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Duplicate menu selector: {0}")]
    DuplicateSelector(String),
}

/// Errors from calls against the collector agent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("{0}")]
    Transport(String),

    /// The agent answered with a non-success status; `message` is the body text
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The agent answered but the payload could not be decoded
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid agent URL: {0}")]
    InvalidUrl(String),
}

impl ServiceError {
    /// Text shown to the user when the call fails.
    ///
    /// Status failures surface the agent's own response text unchanged.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status code, if the agent answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else if e.is_builder() {
            ServiceError::InvalidUrl(e.to_string())
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// TUI-related errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Failed to initialize terminal: {0}")]
    InitFailed(String),

    #[error("Failed to restore terminal: {0}")]
    RestoreFailed(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
