//! Terminal UI module using ratatui
//!
//! Event-driven console frame with:
//! - Grouped side menu (full or compact)
//! - Content panel hosting the active configuration view
//! - Blocking overlay and modal dialogs

mod app;
mod event;
pub mod theme;
pub mod widgets;

pub use app::*;
pub use event::*;
