//! Runtime status panel
//!
//! Shown in the content area when no configuration view is active.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::shell::{ReloadResult, SessionInfo};
use crate::tui::theme::Theme;

/// Refresh bookkeeping for the runtime panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeStatus {
    /// A reload asked the panel to refresh and it has not settled yet
    pub refreshing: bool,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl RuntimeStatus {
    pub fn begin_refresh(&mut self) {
        self.refreshing = true;
    }

    pub fn finish_refresh(&mut self) {
        if self.refreshing {
            self.refreshing = false;
            self.refreshed_at = Some(Utc::now());
        }
    }
}

/// Agent status widget
pub struct RuntimePanel<'a> {
    server_url: &'a str,
    session: &'a SessionInfo,
    last_reload: Option<&'a ReloadResult>,
    status: &'a RuntimeStatus,
    theme: &'a Theme,
    block: Option<Block<'a>>,
}

impl<'a> RuntimePanel<'a> {
    pub fn new(
        server_url: &'a str,
        session: &'a SessionInfo,
        status: &'a RuntimeStatus,
        theme: &'a Theme,
    ) -> Self {
        Self {
            server_url,
            session,
            last_reload: None,
            status,
            theme,
            block: None,
        }
    }

    pub fn last_reload(mut self, last_reload: Option<&'a ReloadResult>) -> Self {
        self.last_reload = last_reload;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn field(&self, label: &'static str, value: String) -> Line<'a> {
        Line::from(vec![
            Span::styled(
                format!("{:<14}", label),
                Style::default().fg(self.theme.text_secondary),
            ),
            Span::styled(value, Style::default().fg(self.theme.text_primary)),
        ])
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let (state, color) = if self.status.refreshing {
            ("refreshing", self.theme.state_pending)
        } else if self.session.signed_in {
            ("connected", self.theme.state_ok)
        } else {
            ("unavailable", self.theme.state_down)
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{:<14}", "Agent"),
                    Style::default().fg(self.theme.text_secondary),
                ),
                Span::styled(
                    format!("● {}", state),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]),
            self.field("URL", self.server_url.to_string()),
            Line::default(),
        ];

        match &self.session.version {
            Some(version) => {
                lines.push(self.field("Instance", version.instance_id.clone()));
                lines.push(self.field("Version", version.version.clone()));
                lines.push(self.field("Commit", version.commit.clone()));
                lines.push(self.field("Branch", version.branch.clone()));
                lines.push(self.field("Build", version.build_stamp.clone()));
            }
            None => lines.push(Line::styled(
                "No version information available",
                Style::default().fg(self.theme.text_secondary),
            )),
        }

        lines.push(Line::default());
        let reload = self
            .last_reload
            .map(|r| r.to_string())
            .unwrap_or_else(|| "never".to_string());
        lines.push(self.field("Last reload", reload));

        if let Some(at) = self.status.refreshed_at {
            lines.push(self.field(
                "Refreshed",
                at.with_timezone(&Local).format("%H:%M:%S").to_string(),
            ));
        }

        lines
    }
}

impl<'a> Widget for RuntimePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let paragraph = match self.block {
            Some(block) => paragraph.block(block),
            None => paragraph,
        };
        paragraph.render(area, buf);
    }
}
