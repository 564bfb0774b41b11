//! Console content
//!
//! The side menu layout and the views it mounts.

mod runtime;
mod sections;

pub use runtime::*;
pub use sections::*;

use ratatui::{Frame, layout::Rect};

use crate::error::MenuError;
use crate::shell::{MenuGroup, MenuItem, MenuModel, ShellController, ViewKey, ViewRegistry, Viewable};
use crate::tui::theme::Theme;

pub const INFLUX_SERVERS: &str = "influx-servers";
pub const HMC_SERVERS: &str = "hmc-servers";

/// Selector of the intrinsic runtime status entry
pub const RUNTIME_SELECTOR: &str = "runtime";

/// A mounted view the terminal can draw and scroll
pub trait Panel: Viewable {
    fn scroll_up(&mut self) {}

    fn scroll_down(&mut self) {}

    fn page_up(&mut self) {}

    fn page_down(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// The shell as the console runs it
pub type ConsoleShell = ShellController<dyn Panel>;

/// The console's side menu
pub fn console_menu() -> Result<MenuModel, MenuError> {
    MenuModel::new(vec![
        MenuGroup::new(
            "Runtime",
            "▶",
            vec![MenuItem::intrinsic("Agent status", RUNTIME_SELECTOR)],
        ),
        MenuGroup::new(
            "Server Config",
            "⚙",
            vec![
                MenuItem::with_view(
                    "Influx DB Servers",
                    "ifxserver-component",
                    ViewKey::new(INFLUX_SERVERS),
                ),
                MenuItem::with_view(
                    "HMC Servers",
                    "hmcserver-component",
                    ViewKey::new(HMC_SERVERS),
                ),
            ],
        ),
    ])
}

/// Factories for every view the console menu refers to
pub fn console_registry() -> ViewRegistry<dyn Panel> {
    let mut registry = ViewRegistry::new();
    registry
        .register(ViewKey::new(INFLUX_SERVERS), || {
            Box::new(SectionView::influx_servers()) as Box<dyn Panel>
        })
        .register(ViewKey::new(HMC_SERVERS), || {
            Box::new(SectionView::hmc_servers()) as Box<dyn Panel>
        });
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_menu_view_is_registered() {
        let menu = console_menu().unwrap();
        let registry = console_registry();

        let keys: Vec<&ViewKey> = menu
            .groups()
            .iter()
            .flat_map(|g| g.items.iter())
            .filter_map(|item| item.view())
            .collect();

        assert_eq!(keys.len(), 2);
        for key in keys {
            assert!(registry.contains(key), "missing view for {}", key);
        }
    }

    #[test]
    fn test_runtime_entry_is_intrinsic() {
        let menu = console_menu().unwrap();
        let item = menu.find(RUNTIME_SELECTOR).unwrap();
        assert!(item.view().is_none());
    }
}
