//! TUI widgets
//!
//! Custom ratatui widgets for the console frame:
//! - `MenuList` - Grouped side menu
//! - `EntryTable` - Configuration entries as a scrollable table
//! - `BlockingOverlay` - Spinner panel shown while a long operation runs

mod entry_table;
mod menu_list;
mod overlay;

pub use entry_table::*;
pub use menu_list::*;
pub use overlay::*;
