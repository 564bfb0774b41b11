//! Navigation shell core
//!
//! Provides the state behind the console frame:
//! - `MenuModel` - Side menu groups and items
//! - `ViewSelector` - Active content view, resolved through a `ViewRegistry`
//! - `BlockingCoordinator` - Single-slot blocking overlay
//! - `ModalRegistry` - Import and about dialogs
//! - `ShellController` - Orchestration and the async result channel

mod blocking;
mod collaborators;
mod controller;
mod menu;
mod modal;
mod types;
mod view;

pub use blocking::*;
pub use collaborators::*;
pub use controller::*;
pub use menu::*;
pub use modal::*;
pub use types::*;
pub use view::*;
