//! Configuration entry table
//!
//! Renders a list of JSON entries as a table with a fixed set of columns and
//! vertical scrolling.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Text,
    widgets::{Block, Row, Table, Widget},
};
use serde_json::Value;

use crate::tui::theme::Theme;

/// A table column: header text and the entry field it shows
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub field: &'static str,
    pub width: u16,
}

impl Column {
    pub const fn new(header: &'static str, field: &'static str, width: u16) -> Self {
        Self {
            header,
            field,
            width,
        }
    }
}

/// Render a JSON field as a table cell
pub fn cell_text(entry: &Value, field: &str) -> String {
    match entry.get(field) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "yes".to_string(),
        Some(Value::Bool(false)) => "no".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Table widget over configuration entries
pub struct EntryTable<'a> {
    entries: &'a [Value],
    columns: &'a [Column],
    theme: &'a Theme,
    block: Option<Block<'a>>,
    scroll: usize,
}

impl<'a> EntryTable<'a> {
    pub fn new(entries: &'a [Value], columns: &'a [Column], theme: &'a Theme) -> Self {
        Self {
            entries,
            columns,
            theme,
            block: None,
            scroll: 0,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl<'a> Widget for EntryTable<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(self.columns.iter().map(|c| Text::raw(c.header)))
            .style(self.theme.table_header());

        let rows = self.entries.iter().skip(self.scroll).map(|entry| {
            Row::new(
                self.columns
                    .iter()
                    .map(|c| Text::raw(cell_text(entry, c.field))),
            )
        });

        let widths = self.columns.iter().map(|c| Constraint::Min(c.width));
        let table = Table::new(rows, widths).header(header).column_spacing(2);
        let table = match self.block {
            Some(block) => table.block(block),
            None => table,
        };

        Widget::render(table, area, buf);
    }
}

/// Scroll position over a list of rows
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollState {
    /// First visible row
    pub offset: usize,
    pub total_rows: usize,
    pub visible_rows: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        self.clamp();
    }

    pub fn set_visible(&mut self, visible_rows: usize) {
        self.visible_rows = visible_rows;
        self.clamp();
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n);
        self.clamp();
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.visible_rows.saturating_sub(1).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.visible_rows.saturating_sub(1).max(1));
    }

    fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.visible_rows)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        let entry = json!({"ID": "influx01", "Port": 8086, "EnableSSL": false, "User": null});
        assert_eq!(cell_text(&entry, "ID"), "influx01");
        assert_eq!(cell_text(&entry, "Port"), "8086");
        assert_eq!(cell_text(&entry, "EnableSSL"), "no");
        assert_eq!(cell_text(&entry, "User"), "-");
        assert_eq!(cell_text(&entry, "Missing"), "-");
    }

    #[test]
    fn test_scroll_state() {
        let mut state = ScrollState::new();
        state.set_visible(10);
        state.set_total(25);

        state.scroll_down(4);
        assert_eq!(state.offset, 4);

        state.page_down();
        assert_eq!(state.offset, 13);

        // Clamped to total - visible
        state.scroll_down(100);
        assert_eq!(state.offset, 15);

        state.page_up();
        assert_eq!(state.offset, 6);

        state.set_total(3);
        assert_eq!(state.offset, 0);
    }
}
