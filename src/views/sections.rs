//! Configuration section views
//!
//! Each section lists the entries of one agent configuration collection.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use serde_json::Value;

use super::Panel;
use crate::error::ServiceError;
use crate::shell::Viewable;
use crate::tui::theme::Theme;
use crate::tui::widgets::{Column, EntryTable, ScrollState};

pub const INFLUX_COLUMNS: &[Column] = &[
    Column::new("ID", "ID", 12),
    Column::new("Host", "Host", 16),
    Column::new("Port", "Port", 6),
    Column::new("DB", "DB", 10),
    Column::new("User", "User", 10),
    Column::new("Retention", "Retention", 10),
    Column::new("Description", "Description", 16),
];

pub const HMC_COLUMNS: &[Column] = &[
    Column::new("ID", "ID", 12),
    Column::new("Host", "Host", 16),
    Column::new("Port", "Port", 6),
    Column::new("User", "User", 10),
    Column::new("Active", "Active", 6),
    Column::new("Description", "Description", 16),
];

#[derive(Debug, Clone, PartialEq)]
pub enum SectionState {
    Loading,
    Loaded(Vec<Value>),
    Failed(String),
}

/// Table view over one configuration collection
pub struct SectionView {
    title: &'static str,
    source: &'static str,
    columns: &'static [Column],
    state: SectionState,
    scroll: ScrollState,
}

impl SectionView {
    pub fn new(title: &'static str, source: &'static str, columns: &'static [Column]) -> Self {
        Self {
            title,
            source,
            columns,
            state: SectionState::Loading,
            scroll: ScrollState::new(),
        }
    }

    pub fn influx_servers() -> Self {
        Self::new("Influx DB Servers", "/api/cfg/influxservers", INFLUX_COLUMNS)
    }

    pub fn hmc_servers() -> Self {
        Self::new("HMC Servers", "/api/cfg/hmcservers", HMC_COLUMNS)
    }

    pub fn state(&self) -> &SectionState {
        &self.state
    }
}

impl Viewable for SectionView {
    fn title(&self) -> &str {
        self.title
    }

    fn source(&self) -> Option<&str> {
        Some(self.source)
    }

    fn load(&mut self, entries: Result<Vec<Value>, ServiceError>) {
        self.state = match entries {
            Ok(entries) => {
                self.scroll.set_total(entries.len());
                SectionState::Loaded(entries)
            }
            Err(e) => SectionState::Failed(e.user_message()),
        };
    }
}

impl Panel for SectionView {
    fn scroll_up(&mut self) {
        self.scroll.scroll_up(1);
    }

    fn scroll_down(&mut self) {
        self.scroll.scroll_down(1);
    }

    fn page_up(&mut self) {
        self.scroll.page_up();
    }

    fn page_down(&mut self) {
        self.scroll.page_down();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let title = match &self.state {
            SectionState::Loaded(entries) => format!(" {} ({}) ", self.title, entries.len()),
            _ => format!(" {} ", self.title),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border(true));

        match &self.state {
            SectionState::Loading => {
                let paragraph = Paragraph::new("Loading...")
                    .style(Style::default().fg(theme.text_secondary))
                    .block(block);
                frame.render_widget(paragraph, area);
            }
            SectionState::Failed(message) => {
                let paragraph = Paragraph::new(format!("Failed to load entries: {}", message))
                    .style(Style::default().fg(theme.state_down))
                    .wrap(Wrap { trim: true })
                    .block(block);
                frame.render_widget(paragraph, area);
            }
            SectionState::Loaded(entries) if entries.is_empty() => {
                let paragraph = Paragraph::new("No entries configured")
                    .style(Style::default().fg(theme.text_secondary))
                    .block(block);
                frame.render_widget(paragraph, area);
            }
            SectionState::Loaded(entries) => {
                // Borders plus header row
                self.scroll
                    .set_visible(area.height.saturating_sub(3) as usize);
                let table = EntryTable::new(entries, self.columns, theme)
                    .block(block)
                    .scroll(self.scroll.offset);
                frame.render_widget(table, area);
            }
        }
    }
}
