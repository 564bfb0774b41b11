//! Blocking overlay coordination
//!
//! A single-slot gate: the overlay is visible iff the state is `Blocking`.
//! `start` overwrites the message of an active block and `stop` is a no-op when
//! idle. There is no queue or count of pending blocks, so overlapping long
//! operations can clear the overlay before the last one settles.

use chrono::{DateTime, Utc};
use tracing::debug;

/// State of the blocking overlay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockingState {
    #[default]
    Idle,
    Blocking {
        message: String,
        since: DateTime<Utc>,
    },
}

impl BlockingState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Blocking { .. })
    }

    /// Message of the active block
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Blocking { message, .. } => Some(message),
            Self::Idle => None,
        }
    }
}

/// Start/stop protocol for the full-shell blocking overlay
#[derive(Debug, Default)]
pub struct BlockingCoordinator {
    state: BlockingState,
}

impl BlockingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay with `message`, replacing any message already shown
    pub fn start(&mut self, message: impl Into<String>) {
        let message = message.into();
        if let BlockingState::Blocking { message: previous, .. } = &self.state {
            debug!("Blocking message replaced: '{}' -> '{}'", previous, message);
        }
        self.state = BlockingState::Blocking {
            message,
            since: Utc::now(),
        };
    }

    /// Hide the overlay
    pub fn stop(&mut self) {
        if !self.state.is_active() {
            debug!("Blocking stop while idle");
        }
        self.state = BlockingState::Idle;
    }

    pub fn state(&self) -> &BlockingState {
        &self.state
    }

    pub fn is_blocking(&self) -> bool {
        self.state.is_active()
    }
}
