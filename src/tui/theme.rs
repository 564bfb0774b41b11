//! TUI Theme configuration
//!
//! Centralized palette for the console frame. Supports multiple color depths for
//! terminal compatibility.

use ratatui::style::{Color, Modifier, Style};

/// Terminal color capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Basic 16 ANSI colors (maximum compatibility)
    Basic,
    /// 256 color palette
    #[default]
    Indexed,
    /// True color (24-bit RGB)
    TrueColor,
}

impl ColorMode {
    /// Detect the best color mode for the current terminal
    pub fn detect() -> Self {
        if let Ok(colorterm) = std::env::var("COLORTERM") {
            if colorterm == "truecolor" || colorterm == "24bit" {
                return Self::TrueColor;
            }
        }

        if let Ok(term) = std::env::var("TERM") {
            if term.contains("kitty") || term.contains("alacritty") {
                return Self::TrueColor;
            }
            if term.contains("256color") {
                return Self::Indexed;
            }
        }

        Self::Basic
    }
}

/// Theme configuration for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Pane borders
    pub border_focused: Color,
    pub border_unfocused: Color,

    // Selection
    pub selection_bg: Color,
    pub selection_fg: Option<Color>,

    // Side menu
    pub menu_group: Color,
    pub menu_item: Color,
    pub menu_intrinsic: Color,

    // Agent state indicators
    pub state_ok: Color,
    pub state_pending: Color,
    pub state_down: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_accent: Color,

    // Blocking overlay
    pub overlay_border: Color,
    pub overlay_spinner: Color,

    // Modal borders
    pub modal_info: Color,
    pub modal_warning: Color,
    pub modal_error: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_color_mode(ColorMode::detect())
    }
}

impl Theme {
    /// Create a theme for the specified color mode
    pub fn for_color_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Basic => Self::basic(),
            ColorMode::Indexed => Self::indexed(),
            ColorMode::TrueColor => Self::truecolor(),
        }
    }

    /// Basic 16-color theme
    pub fn basic() -> Self {
        Self {
            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,

            selection_bg: Color::Blue,
            selection_fg: Some(Color::White),

            menu_group: Color::Green,
            menu_item: Color::Reset,
            menu_intrinsic: Color::Cyan,

            state_ok: Color::Green,
            state_pending: Color::Yellow,
            state_down: Color::Red,

            text_primary: Color::Reset,
            text_secondary: Color::DarkGray,
            text_accent: Color::Blue,

            overlay_border: Color::Yellow,
            overlay_spinner: Color::Cyan,

            modal_info: Color::Cyan,
            modal_warning: Color::Yellow,
            modal_error: Color::Red,

            status_bar_bg: Color::Blue,
            status_bar_fg: Color::White,
        }
    }

    /// 256-color theme
    pub fn indexed() -> Self {
        Self {
            border_focused: Color::Indexed(117),
            border_unfocused: Color::Indexed(243),

            selection_bg: Color::Indexed(60),
            selection_fg: Some(Color::Indexed(255)),

            menu_group: Color::Indexed(108),
            menu_item: Color::Indexed(252),
            menu_intrinsic: Color::Indexed(147),

            state_ok: Color::Indexed(156),
            state_pending: Color::Indexed(222),
            state_down: Color::Indexed(210),

            text_primary: Color::Reset,
            text_secondary: Color::Indexed(250),
            text_accent: Color::Indexed(147),

            overlay_border: Color::Indexed(222),
            overlay_spinner: Color::Indexed(117),

            modal_info: Color::Indexed(117),
            modal_warning: Color::Indexed(222),
            modal_error: Color::Indexed(210),

            status_bar_bg: Color::Indexed(236),
            status_bar_fg: Color::Indexed(252),
        }
    }

    /// True color theme
    pub fn truecolor() -> Self {
        Self {
            border_focused: Color::Rgb(137, 180, 250),
            border_unfocused: Color::Rgb(88, 91, 112),

            selection_bg: Color::Rgb(69, 71, 90),
            selection_fg: Some(Color::Rgb(245, 245, 250)),

            menu_group: Color::Rgb(129, 178, 134),
            menu_item: Color::Rgb(205, 214, 244),
            menu_intrinsic: Color::Rgb(180, 190, 254),

            state_ok: Color::Rgb(166, 227, 161),
            state_pending: Color::Rgb(249, 226, 175),
            state_down: Color::Rgb(243, 139, 168),

            text_primary: Color::Rgb(245, 245, 250),
            text_secondary: Color::Rgb(166, 173, 200),
            text_accent: Color::Rgb(180, 190, 254),

            overlay_border: Color::Rgb(249, 226, 175),
            overlay_spinner: Color::Rgb(137, 180, 250),

            modal_info: Color::Rgb(137, 180, 250),
            modal_warning: Color::Rgb(249, 226, 175),
            modal_error: Color::Rgb(243, 139, 168),

            status_bar_bg: Color::Rgb(49, 50, 68),
            status_bar_fg: Color::Rgb(205, 214, 244),
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        let color = if focused {
            self.border_focused
        } else {
            self.border_unfocused
        };
        Style::default().fg(color)
    }

    /// Style for selected items
    pub fn selection(&self) -> Style {
        let style = Style::default().bg(self.selection_bg);
        match self.selection_fg {
            Some(fg) => style.fg(fg),
            None => style,
        }
    }

    pub fn table_header(&self) -> Style {
        Style::default()
            .fg(self.text_accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.status_bar_bg).fg(self.status_bar_fg)
    }
}
