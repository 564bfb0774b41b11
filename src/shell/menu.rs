//! Side menu model
//!
//! Groups of navigable sections. Only the per-group `expanded` flag is mutable.

use std::collections::HashSet;
use std::fmt;

use crate::error::MenuError;

/// Stable key identifying a dynamic content view in the [`ViewRegistry`]
///
/// [`ViewRegistry`]: super::ViewRegistry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey(String);

impl ViewKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable navigation entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display title
    pub title: String,
    /// Identifier unique across the whole menu
    pub selector: String,
    /// Dynamic view bound to this entry; `None` for intrinsic views
    view: Option<ViewKey>,
}

impl MenuItem {
    /// Entry bound to a dynamic view
    pub fn with_view(
        title: impl Into<String>,
        selector: impl Into<String>,
        view: ViewKey,
    ) -> Self {
        Self {
            title: title.into(),
            selector: selector.into(),
            view: Some(view),
        }
    }

    /// Entry for an intrinsic view (rendered outside the view selector)
    pub fn intrinsic(title: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            selector: selector.into(),
            view: None,
        }
    }

    pub fn view(&self) -> Option<&ViewKey> {
        self.view.as_ref()
    }
}

/// A titled group of menu items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup {
    pub name: String,
    /// Symbol drawn before the group name
    pub icon: String,
    pub expanded: bool,
    pub items: Vec<MenuItem>,
}

impl MenuGroup {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            expanded: true,
            items,
        }
    }
}

/// Flattened menu row used for keyboard navigation and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    /// A group header
    Group {
        index: usize,
        name: String,
        icon: String,
        expanded: bool,
        item_count: usize,
    },
    /// An item under an expanded group
    Item {
        group: usize,
        index: usize,
        title: String,
        selector: String,
        dynamic: bool,
    },
}

impl MenuRow {
    /// Unique key for selection tracking
    pub fn key(&self) -> String {
        match self {
            Self::Group { index, .. } => format!("group:{}", index),
            Self::Item { selector, .. } => format!("item:{}", selector),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }
}

/// The side menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuModel {
    groups: Vec<MenuGroup>,
}

impl MenuModel {
    /// Build a menu, rejecting duplicate selectors
    pub fn new(groups: Vec<MenuGroup>) -> Result<Self, MenuError> {
        let mut seen = HashSet::new();
        for item in groups.iter().flat_map(|g| g.items.iter()) {
            if !seen.insert(item.selector.as_str()) {
                return Err(MenuError::DuplicateSelector(item.selector.clone()));
            }
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[MenuGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flip the `expanded` flag of a group and return its new value
    pub fn toggle_expand(&mut self, group_index: usize) -> Result<bool, MenuError> {
        let len = self.groups.len();
        let group = self
            .groups
            .get_mut(group_index)
            .ok_or(MenuError::IndexOutOfRange {
                index: group_index,
                len,
            })?;

        group.expanded = !group.expanded;
        Ok(group.expanded)
    }

    /// Look up an item by position
    pub fn item(&self, group: usize, index: usize) -> Option<&MenuItem> {
        self.groups.get(group)?.items.get(index)
    }

    /// Look up an item by selector
    pub fn find(&self, selector: &str) -> Option<&MenuItem> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter())
            .find(|item| item.selector == selector)
    }

    /// Rows in display order; items of collapsed groups are hidden
    pub fn rows(&self) -> Vec<MenuRow> {
        let mut rows = Vec::new();

        for (gi, group) in self.groups.iter().enumerate() {
            rows.push(MenuRow::Group {
                index: gi,
                name: group.name.clone(),
                icon: group.icon.clone(),
                expanded: group.expanded,
                item_count: group.items.len(),
            });

            if !group.expanded {
                continue;
            }

            for (ii, item) in group.items.iter().enumerate() {
                rows.push(MenuRow::Item {
                    group: gi,
                    index: ii,
                    title: item.title.clone(),
                    selector: item.selector.clone(),
                    dynamic: item.view.is_some(),
                });
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sample_menu() -> MenuModel {
        MenuModel::new(vec![
            MenuGroup::new(
                "Runtime",
                "▶",
                vec![MenuItem::intrinsic("Agent status", "runtime")],
            ),
            MenuGroup::new(
                "Server Config",
                "⚙",
                vec![
                    MenuItem::with_view("Influx DB Servers", "ifxserver", ViewKey::new("influx")),
                    MenuItem::with_view("HMC Servers", "hmcserver", ViewKey::new("hmc")),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_toggle_expand_returns_new_value() {
        let mut menu = sample_menu();
        assert!(menu.groups()[1].expanded);

        assert_eq!(menu.toggle_expand(1), Ok(false));
        assert!(!menu.groups()[1].expanded);
        // Other groups untouched
        assert!(menu.groups()[0].expanded);

        assert_eq!(menu.toggle_expand(1), Ok(true));
    }

    #[test]
    fn test_toggle_expand_out_of_range() {
        let mut menu = sample_menu();
        let before = menu.clone();

        assert_eq!(
            menu.toggle_expand(2),
            Err(MenuError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(menu, before);
    }

    #[test]
    fn test_duplicate_selector_rejected() {
        let result = MenuModel::new(vec![MenuGroup::new(
            "A",
            "*",
            vec![
                MenuItem::intrinsic("One", "dup"),
                MenuItem::intrinsic("Two", "dup"),
            ],
        )]);
        assert_eq!(result, Err(MenuError::DuplicateSelector("dup".to_string())));
    }

    #[test]
    fn test_rows_hide_collapsed_items() {
        let mut menu = sample_menu();
        assert_eq!(menu.rows().len(), 5);

        menu.toggle_expand(1).unwrap();
        let rows = menu.rows();
        assert_eq!(rows.len(), 3);
        assert!(rows[2].is_group());
        assert_eq!(rows[2].key(), "group:1");
        assert_eq!(rows[1].key(), "item:runtime");
    }

    #[test]
    fn test_find_and_item_lookup() {
        let menu = sample_menu();
        let item = menu.find("hmcserver").unwrap();
        assert_eq!(item.view(), Some(&ViewKey::new("hmc")));
        assert_eq!(menu.item(0, 0).unwrap().view(), None);
        assert!(menu.item(3, 0).is_none());
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_is_involution(index in 0usize..2) {
            let mut menu = sample_menu();
            let original = menu.groups()[index].expanded;

            menu.toggle_expand(index).unwrap();
            menu.toggle_expand(index).unwrap();

            prop_assert_eq!(menu.groups()[index].expanded, original);
        }

        #[test]
        fn prop_out_of_range_leaves_menu_unchanged(index in 2usize..1000) {
            let mut menu = sample_menu();
            let before = menu.clone();

            prop_assert!(menu.toggle_expand(index).is_err());
            prop_assert_eq!(menu, before);
        }
    }
}
