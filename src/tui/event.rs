//! Event handling for the TUI
//!
//! Provides an async event stream that combines:
//! - Terminal input events (keyboard, resize)
//! - Notifications raised by the shell's collaborators
//! - Render ticks

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::shell::{AlertSink, Navigator, RuntimeObserver};

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Terminal input event
    Input(InputEvent),
    /// Render tick
    Tick,
    /// Error to show in a blocking alert
    Alert(String),
    /// The session ended; leave for the sign-in destination
    SignedOut,
    /// The runtime status panel should refresh
    RuntimeRefresh,
}

/// Input events from the terminal
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// User commands triggered by input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Navigate up in the menu
    NavigateUp,
    /// Navigate down in the menu
    NavigateDown,
    /// Open the selected item or toggle the selected group
    Select,
    /// Expand or collapse the selected group
    ToggleGroup,
    /// Switch between the full and compact menu
    ToggleMenuMode,
    /// Move focus between the menu and the content panel
    FocusNext,
    /// Reload the agent configuration
    ReloadConfig,
    /// Open the import dialog
    Import,
    /// Open the about dialog
    About,
    /// End the session
    Logout,
    /// Open the documentation in a browser
    OpenDocs,
    /// Re-fetch the active view
    RefreshView,
    /// Show help
    ShowHelp,
    /// Quit application
    Quit,
    /// Cancel current operation
    Cancel,
    /// Page up in content
    PageUp,
    /// Page down in content
    PageDown,
}

impl UserCommand {
    /// Convert a key event to a user command
    ///
    /// Dialogs that take text read raw key codes instead.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match (key.code, key.modifiers) {
            // Navigation
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                Some(UserCommand::NavigateUp)
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                Some(UserCommand::NavigateDown)
            }

            // Selection
            (KeyCode::Enter, _) => Some(UserCommand::Select),
            (KeyCode::Char(' '), _) => Some(UserCommand::ToggleGroup),

            // Layout
            (KeyCode::Char('m'), KeyModifiers::NONE) => Some(UserCommand::ToggleMenuMode),
            (KeyCode::Tab, _) => Some(UserCommand::FocusNext),

            // Agent actions
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(UserCommand::ReloadConfig),
            (KeyCode::Char('i'), KeyModifiers::NONE) => Some(UserCommand::Import),
            (KeyCode::Char('a'), KeyModifiers::NONE) => Some(UserCommand::About),
            (KeyCode::Char('L'), KeyModifiers::SHIFT) => Some(UserCommand::Logout),
            (KeyCode::Char('o'), KeyModifiers::NONE) => Some(UserCommand::OpenDocs),
            (KeyCode::F(5), _) => Some(UserCommand::RefreshView),

            // Scrolling
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(UserCommand::PageUp),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some(UserCommand::PageDown),
            (KeyCode::PageUp, _) => Some(UserCommand::PageUp),
            (KeyCode::PageDown, _) => Some(UserCommand::PageDown),

            // Help and quit
            (KeyCode::Char('?'), _) => Some(UserCommand::ShowHelp),
            (KeyCode::Char('q'), KeyModifiers::NONE | KeyModifiers::CONTROL) => {
                Some(UserCommand::Quit)
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(UserCommand::Quit),

            (KeyCode::Esc, _) => Some(UserCommand::Cancel),

            _ => None,
        }
    }
}

/// Event loop handle
pub struct EventLoop {
    /// Sender for terminal input and ticks
    tx: mpsc::Sender<AppEvent>,
    /// Receiver for terminal input and ticks
    rx: mpsc::Receiver<AppEvent>,
    /// Sender for shell notifications, which must never be dropped
    shell_tx: mpsc::UnboundedSender<AppEvent>,
    shell_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventLoop {
    /// Create a new event loop
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(256);
        let (shell_tx, shell_rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            shell_tx,
            shell_rx,
        }
    }

    /// Get a sender for shell notifications
    pub fn shell_sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.shell_tx.clone()
    }

    /// Start the event loop
    ///
    /// This spawns background tasks for:
    /// - Terminal input
    /// - Render ticks
    pub fn start(&mut self, tick_rate: Duration) {
        let tx = self.tx.clone();

        // Terminal input task - single long-running reader
        tokio::spawn(async move {
            let mut reader = EventStream::new();

            loop {
                match reader.next().fuse().await {
                    Some(Ok(event)) => {
                        let app_event = match event {
                            CrosstermEvent::Key(key) => AppEvent::Input(InputEvent::Key(key)),
                            CrosstermEvent::Resize(w, h) => {
                                AppEvent::Input(InputEvent::Resize(w, h))
                            }
                            _ => continue,
                        };

                        if tx.send(app_event).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("Error reading terminal event: {}", e);
                        continue;
                    }
                    None => break,
                }
            }
        });

        // Render tick task
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);

            loop {
                interval.tick().await;
                if tx.send(AppEvent::Tick).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Receive the next event; shell notifications go first
    pub async fn next(&mut self) -> Option<AppEvent> {
        tokio::select! {
            biased;
            Some(event) = self.shell_rx.recv() => Some(event),
            event = self.rx.recv() => event,
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes the shell's navigator, alert and runtime notifications into the event
/// loop, so the TUI reacts to them on its own task
#[derive(Debug, Clone)]
pub struct ShellBridge {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ShellBridge {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    fn post(&self, event: AppEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("UI closed, dropped event: {:?}", e.0);
        }
    }
}

impl Navigator for ShellBridge {
    fn go_to_sign_in(&self) {
        self.post(AppEvent::SignedOut);
    }
}

impl AlertSink for ShellBridge {
    fn show(&self, message: &str) {
        self.post(AppEvent::Alert(message.to_string()));
    }
}

impl RuntimeObserver for ShellBridge {
    fn refresh_status(&self) {
        self.post(AppEvent::RuntimeRefresh);
    }
}
