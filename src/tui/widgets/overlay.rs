//! Blocking overlay widget
//!
//! A centered panel with a spinner and the blocking message, drawn over the whole
//! frame while a long operation is in flight.

use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, StatefulWidget, Widget},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::tui::theme::Theme;

pub struct BlockingOverlay<'a> {
    message: &'a str,
    since: DateTime<Utc>,
    theme: &'a Theme,
}

impl<'a> BlockingOverlay<'a> {
    pub fn new(message: &'a str, since: DateTime<Utc>, theme: &'a Theme) -> Self {
        Self {
            message,
            since,
            theme,
        }
    }
}

impl<'a> StatefulWidget for BlockingOverlay<'a> {
    type State = ThrobberState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let width = (self.message.chars().count() as u16 + 10)
            .max(30)
            .min(area.width);
        let panel = centered_fixed(width, 5, area);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.overlay_border));
        let inner = block.inner(panel);
        block.render(panel, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let throbber = Throbber::default()
            .label(self.message)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .throbber_style(Style::default().fg(self.theme.overlay_spinner));
        StatefulWidget::render(throbber, rows[0], buf, state);

        let elapsed = (Utc::now() - self.since).num_seconds().max(0);
        Paragraph::new(Line::styled(
            format!("{}s elapsed", elapsed),
            Style::default().fg(self.theme.text_secondary),
        ))
        .render(rows[1], buf);
    }
}

/// Center a fixed-size rect inside `area`, shrinking it if needed
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_centered_fixed() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_fixed(40, 10, area);
        assert_eq!(rect, Rect::new(30, 20, 40, 10));

        // Larger than the area
        let rect = centered_fixed(200, 100, area);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_overlay_shows_message() {
        let theme = Theme::basic();
        let mut state = ThrobberState::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();

        terminal
            .draw(|f| {
                let overlay = BlockingOverlay::new("Reloading Conf. Please wait...", Utc::now(), &theme);
                f.render_stateful_widget(overlay, f.area(), &mut state);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Reloading Conf. Please wait..."));
    }
}
