//! Side menu widget
//!
//! Displays menu groups and their items in an indented list. In compact mode only
//! the group icons and item initials are drawn.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget},
};

use crate::shell::MenuRow;
use crate::tui::theme::Theme;

/// Menu list widget
pub struct MenuList<'a> {
    rows: &'a [MenuRow],
    theme: &'a Theme,
    block: Option<Block<'a>>,
    compact: bool,
    /// Selector of the item whose view is on screen
    active_selector: Option<&'a str>,
}

impl<'a> MenuList<'a> {
    pub fn new(rows: &'a [MenuRow], theme: &'a Theme) -> Self {
        Self {
            rows,
            theme,
            block: None,
            compact: false,
            active_selector: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn active_selector(mut self, selector: Option<&'a str>) -> Self {
        self.active_selector = selector;
        self
    }

    fn to_list_items(&self) -> Vec<ListItem<'a>> {
        self.rows
            .iter()
            .map(|row| match row {
                MenuRow::Group {
                    name,
                    icon,
                    expanded,
                    item_count,
                    ..
                } => {
                    let arrow = if *expanded { "▾" } else { "▸" };
                    let style = Style::default()
                        .fg(self.theme.menu_group)
                        .add_modifier(Modifier::BOLD);

                    if self.compact {
                        return ListItem::new(Line::from(Span::styled(
                            format!("{}{}", arrow, icon),
                            style,
                        )));
                    }

                    let mut spans = vec![
                        Span::styled(format!("{} {} ", arrow, icon), style),
                        Span::styled(name.clone(), style),
                    ];
                    if !*expanded && *item_count > 0 {
                        spans.push(Span::styled(
                            format!(" ({})", item_count),
                            Style::default().fg(self.theme.text_secondary),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                }

                MenuRow::Item {
                    title,
                    selector,
                    dynamic,
                    ..
                } => {
                    let color = if *dynamic {
                        self.theme.menu_item
                    } else {
                        self.theme.menu_intrinsic
                    };
                    let mut style = Style::default().fg(color);
                    if self.active_selector == Some(selector.as_str()) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }

                    let label = if self.compact {
                        format!("  {}", title.trim().chars().next().unwrap_or('·'))
                    } else {
                        format!("   └ {}", title.trim())
                    };
                    ListItem::new(Line::from(Span::styled(label, style)))
                }
            })
            .collect()
    }
}

impl<'a> StatefulWidget for MenuList<'a> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let items = self.to_list_items();
        let list = List::new(items).highlight_style(self.theme.selection());
        let list = match self.block {
            Some(block) => list.block(block),
            None => list,
        };

        StatefulWidget::render(list, area, buf, state);
    }
}

/// Selection state for the side menu
#[derive(Debug, Default)]
pub struct MenuListState {
    pub list_state: ListState,
    pub row_count: usize,
}

impl MenuListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.list_state.select(index);
    }

    /// Select the next row, wrapping at the end
    pub fn next(&mut self) {
        if self.row_count == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.row_count => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous row, wrapping at the start
    pub fn previous(&mut self) {
        if self.row_count == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) => self.row_count - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Update row count and keep the selection in range
    pub fn set_row_count(&mut self, count: usize) {
        self.row_count = count;

        match self.list_state.selected() {
            _ if count == 0 => self.list_state.select(None),
            Some(selected) if selected >= count => self.list_state.select(Some(count - 1)),
            _ => {}
        }
    }
}
