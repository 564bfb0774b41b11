//! Main TUI application
//!
//! Event-driven application that coordinates:
//! - Terminal rendering with ratatui
//! - User input handling
//! - Results of agent calls settling on the shell

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::event::{AppEvent, EventLoop, InputEvent, ShellBridge, UserCommand};
use super::theme::Theme;
use super::widgets::{BlockingOverlay, MenuList, MenuListState};
use crate::config::Config;
use crate::error::{Result, TuiError};
use crate::shell::{
    AgentApi, BlockingState, Collaborators, MenuRow, ModalKind, Settlement, SystemOpener,
    TracingLog,
};
use crate::views::{ConsoleShell, Panel, RuntimePanel, RuntimeStatus, console_menu, console_registry};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPane {
    #[default]
    Menu,
    Content,
}

/// Why the TUI stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    /// The user quit
    Quit,
    /// The session ended; the caller should send the user to sign in again
    SignedOut,
}

/// Application UI state
pub struct AppUiState {
    /// Side menu selection
    pub menu_state: MenuListState,
    /// Flattened menu rows as last rendered
    pub rows: Vec<MenuRow>,
    /// Currently focused pane
    pub focused_pane: FocusedPane,
    pub show_help: bool,
    /// Blocking error alerts, oldest first; any key closes the front one
    pub alerts: VecDeque<String>,
    /// Runtime panel refresh bookkeeping
    pub runtime: RuntimeStatus,
    /// Spinner frame of the blocking overlay
    pub throbber: ThrobberState,
    /// Set once the main loop should stop
    pub exit: Option<ShellExit>,
}

impl Default for AppUiState {
    fn default() -> Self {
        Self {
            menu_state: MenuListState::new(),
            rows: Vec::new(),
            focused_pane: FocusedPane::default(),
            show_help: false,
            alerts: VecDeque::new(),
            runtime: RuntimeStatus::default(),
            throbber: ThrobberState::default(),
            exit: None,
        }
    }
}

/// Main TUI application
pub struct App {
    /// Configuration
    config: Config,
    theme: Theme,
    /// Navigation shell
    shell: ConsoleShell,
    /// Results of agent calls issued by the shell
    settlements: mpsc::UnboundedReceiver<Settlement>,
    /// UI state
    ui_state: AppUiState,
    /// Event loop
    event_loop: EventLoop,
}

impl App {
    /// Create the application and issue the startup session-info fetch
    pub fn new(config: Config, api: Arc<dyn AgentApi>) -> Result<Self> {
        let event_loop = EventLoop::new();
        let bridge = ShellBridge::new(event_loop.shell_sender());

        let collaborators = Collaborators {
            api,
            navigator: Box::new(bridge.clone()),
            alerts: Box::new(bridge.clone()),
            log: Box::new(TracingLog),
            opener: Box::new(SystemOpener),
            runtime: Some(Box::new(bridge)),
        };
        let (shell, settlements) =
            ConsoleShell::new(console_menu()?, console_registry(), collaborators);

        let mut app = Self {
            config,
            theme: Theme::default(),
            shell,
            settlements,
            ui_state: AppUiState::default(),
            event_loop,
        };
        app.sync_rows();
        Ok(app)
    }

    /// Run the application until the user quits or signs out
    pub async fn run(&mut self) -> Result<ShellExit> {
        self.event_loop.start(self.config.tick_rate());

        let mut terminal = self.setup_terminal()?;

        info!("Entering main loop");
        let result = self.main_loop(&mut terminal).await;
        info!("Main loop exited with result: {:?}", result);

        self.restore_terminal(&mut terminal)?;
        result
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|e| TuiError::InitFailed(e.to_string()))?;

        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        terminal
            .show_cursor()
            .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        debug!("Terminal restore complete");
        Ok(())
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<ShellExit> {
        loop {
            self.sync_rows();

            terminal
                .draw(|f| self.render(f))
                .map_err(|e| TuiError::RenderError(e.to_string()))?;

            tokio::select! {
                event = self.event_loop.next() => match event {
                    Some(event) => self.handle_event(event),
                    None => self.ui_state.exit = Some(ShellExit::Quit),
                },
                Some(settlement) = self.settlements.recv() => self.shell.apply(settlement),
            }

            if let Some(exit) = self.ui_state.exit {
                return Ok(exit);
            }
        }
    }

    /// Rebuild the flattened menu after groups were toggled
    fn sync_rows(&mut self) {
        self.ui_state.rows = self.shell.menu().rows();
        self.ui_state
            .menu_state
            .set_row_count(self.ui_state.rows.len());
        if self.ui_state.menu_state.selected().is_none() && !self.ui_state.rows.is_empty() {
            self.ui_state.menu_state.select(Some(0));
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(InputEvent::Key(key)) => self.handle_key(key),
            AppEvent::Input(_) => {}
            AppEvent::Tick => {
                if self.shell.blocking().is_blocking() {
                    self.ui_state.throbber.calc_next();
                } else {
                    self.ui_state.runtime.finish_refresh();
                }
            }
            AppEvent::Alert(message) => self.ui_state.alerts.push_back(message),
            AppEvent::SignedOut => self.ui_state.exit = Some(ShellExit::SignedOut),
            AppEvent::RuntimeRefresh => self.ui_state.runtime.begin_refresh(),
        }
    }

    /// Handle a key press
    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.ui_state.exit = Some(ShellExit::Quit);
            return;
        }

        // Any key closes the alert on screen
        if self.ui_state.alerts.pop_front().is_some() {
            return;
        }

        // The overlay swallows everything but quit
        if self.shell.blocking().is_blocking() {
            if UserCommand::from_key(key) == Some(UserCommand::Quit) {
                self.ui_state.exit = Some(ShellExit::Quit);
            } else {
                debug!("Input ignored while blocking: {:?}", key.code);
            }
            return;
        }

        if self.ui_state.show_help {
            self.ui_state.show_help = false;
            return;
        }

        match self.shell.modals().visible() {
            Some(ModalKind::Import) => self.handle_import_key(key),
            Some(ModalKind::About) => self.shell.close_modal(),
            None => {
                if let Some(cmd) = UserCommand::from_key(key) {
                    self.handle_command(cmd);
                }
            }
        }
    }

    /// Keys typed into the import dialog
    fn handle_import_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.shell.submit_import(),
            KeyCode::Esc => self.shell.close_modal(),
            KeyCode::Tab => self.shell.modals_mut().import_mut().toggle_overwrite(),
            KeyCode::Backspace => self.shell.modals_mut().import_mut().backspace(),
            KeyCode::Char(c) => self.shell.modals_mut().import_mut().push_char(c),
            _ => {}
        }
    }

    /// Handle a user command
    fn handle_command(&mut self, cmd: UserCommand) {
        match cmd {
            UserCommand::NavigateUp => match self.ui_state.focused_pane {
                FocusedPane::Menu => self.ui_state.menu_state.previous(),
                FocusedPane::Content => self.with_content(|view| view.scroll_up()),
            },
            UserCommand::NavigateDown => match self.ui_state.focused_pane {
                FocusedPane::Menu => self.ui_state.menu_state.next(),
                FocusedPane::Content => self.with_content(|view| view.scroll_down()),
            },
            UserCommand::PageUp => self.with_content(|view| view.page_up()),
            UserCommand::PageDown => self.with_content(|view| view.page_down()),
            UserCommand::Select => self.handle_select(),
            UserCommand::ToggleGroup => self.handle_toggle_group(),
            UserCommand::ToggleMenuMode => {
                let compact = self.shell.change_mode_menu();
                debug!("Compact menu: {}", compact);
            }
            UserCommand::FocusNext => {
                self.ui_state.focused_pane = match self.ui_state.focused_pane {
                    FocusedPane::Menu => FocusedPane::Content,
                    FocusedPane::Content => FocusedPane::Menu,
                };
            }
            UserCommand::ReloadConfig => self.shell.reload_config(),
            UserCommand::Import => self.shell.show_import(),
            UserCommand::About => self.shell.show_about(),
            UserCommand::Logout => self.shell.logout(),
            UserCommand::OpenDocs => self.shell.link(self.config.docs_link()),
            UserCommand::RefreshView => self.shell.load_active_view(),
            UserCommand::ShowHelp => self.ui_state.show_help = true,
            UserCommand::Quit => self.ui_state.exit = Some(ShellExit::Quit),
            UserCommand::Cancel => self.shell.clear_status(),
        }
    }

    fn selected_row(&self) -> Option<&MenuRow> {
        self.ui_state
            .menu_state
            .selected()
            .and_then(|i| self.ui_state.rows.get(i))
    }

    /// Enter on a group toggles it, on an item mounts its view
    fn handle_select(&mut self) {
        match self.selected_row().cloned() {
            Some(MenuRow::Group { index, .. }) => self.toggle_group(index),
            Some(MenuRow::Item { group, index, .. }) => {
                self.shell.click_menu_at(group, index);
                if self.shell.views().active().is_some() {
                    self.ui_state.focused_pane = FocusedPane::Content;
                }
            }
            None => {}
        }
    }

    fn handle_toggle_group(&mut self) {
        let group = match self.selected_row() {
            Some(MenuRow::Group { index, .. }) => *index,
            Some(MenuRow::Item { group, .. }) => *group,
            None => return,
        };
        self.toggle_group(group);
    }

    fn toggle_group(&mut self, index: usize) {
        if let Err(e) = self.shell.expand_menu(index) {
            warn!("Menu toggle failed: {}", e);
            return;
        }
        self.sync_rows();

        // Keep the cursor on the group header
        let header = self
            .ui_state
            .rows
            .iter()
            .position(|row| matches!(row, MenuRow::Group { index: i, .. } if *i == index));
        if header.is_some() {
            self.ui_state.menu_state.select(header);
        }
    }

    /// Apply a scroll action to the mounted view, if any
    fn with_content(&mut self, action: impl FnOnce(&mut dyn Panel)) {
        if let Some(active) = self.shell.views_mut().active_mut() {
            action(active.view_mut());
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Body on top, status bar at the bottom
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(size);

        // Menu on the left, content on the right
        let menu_width = if self.shell.is_compact_menu() { 8 } else { 28 };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(menu_width), Constraint::Min(20)])
            .split(rows[0]);

        self.render_menu(frame, columns[0]);
        self.render_content(frame, columns[1]);
        self.render_status_bar(frame, rows[1]);

        self.render_modal(frame, size);
        self.render_overlay(frame, size);
        self.render_alert(frame, size);
    }

    /// Render the side menu
    fn render_menu(&mut self, frame: &mut Frame, area: Rect) {
        let is_focused = self.ui_state.focused_pane == FocusedPane::Menu;
        let compact = self.shell.is_compact_menu();

        let block = Block::default()
            .title(if compact { " ☰ " } else { " Menu " })
            .borders(Borders::ALL)
            .border_style(self.theme.border(is_focused));

        let active_selector = self.shell.views().active_key().and_then(|key| {
            self.shell
                .menu()
                .groups()
                .iter()
                .flat_map(|g| g.items.iter())
                .find(|item| item.view() == Some(key))
                .map(|item| item.selector.as_str())
        });

        let menu = MenuList::new(&self.ui_state.rows, &self.theme)
            .block(block)
            .compact(compact)
            .active_selector(active_selector);

        frame.render_stateful_widget(menu, area, &mut self.ui_state.menu_state.list_state);
    }

    /// Render the active view, or the runtime panel when none is mounted
    fn render_content(&mut self, frame: &mut Frame, area: Rect) {
        if let Some(active) = self.shell.views_mut().active_mut() {
            active.view_mut().render(frame, area, &self.theme);
            return;
        }

        let is_focused = self.ui_state.focused_pane == FocusedPane::Content;
        let block = Block::default()
            .title(" Agent status ")
            .borders(Borders::ALL)
            .border_style(self.theme.border(is_focused));

        let panel = RuntimePanel::new(
            &self.config.server_url,
            self.shell.session(),
            &self.ui_state.runtime,
            &self.theme,
        )
        .last_reload(self.shell.last_reload())
        .block(block);

        frame.render_widget(panel, area);
    }

    /// Render status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let left = match self.shell.status_message() {
            Some(msg) => msg.to_string(),
            None => "? help | r reload | i import | a about | L logout | q quit".to_string(),
        };

        let agent = match &self.shell.session().version {
            Some(version) => version.short_label(),
            None if self.shell.session().signed_in => "agent".to_string(),
            None => "agent unavailable".to_string(),
        };

        let reload = match self.shell.last_reload() {
            Some(reload) => format!("reloaded in {}", reload.elapsed_description),
            None => "not reloaded".to_string(),
        };

        let right = format!(" {} | {} ", agent, reload);
        let width = area.width as usize;
        let padding = width.saturating_sub(left.chars().count() + right.chars().count() + 1);

        let line = Line::from(vec![
            Span::raw(format!(" {}", left)),
            Span::raw(" ".repeat(padding)),
            Span::styled(right, Style::default().add_modifier(Modifier::BOLD)),
        ]);

        frame.render_widget(Paragraph::new(line).style(self.theme.status_bar()), area);
    }

    /// Render help and dialog overlays
    fn render_modal(&self, frame: &mut Frame, area: Rect) {
        if self.ui_state.show_help {
            let modal_area = centered_rect(60, 70, area);
            frame.render_widget(Clear, modal_area);

            let block = Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.modal_info));

            let help_text = r#"
Navigation:
  j/k, Up/Down    Move in the menu (or scroll content)
  Enter           Open item / toggle group
  Space           Expand or collapse group
  Tab             Switch between menu and content
  m               Compact menu

Agent:
  r               Reload configuration
  i               Import configuration file
  F5              Refresh current view
  a               About
  o               Open documentation
  L               Log out

Other:
  ?               Show this help
  q               Quit

Press any key to close this help.
"#;
            frame.render_widget(Paragraph::new(help_text).block(block), modal_area);
            return;
        }

        match self.shell.modals().visible() {
            Some(ModalKind::Import) => {
                let dialog = self.shell.modals().import();
                let modal_area = centered_rect(60, 30, area);
                frame.render_widget(Clear, modal_area);

                let block = Block::default()
                    .title(" Import Configuration ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.modal_warning));

                let mut lines = vec![
                    Line::from("Configuration file (JSON):"),
                    Line::from(format!("> {}_", dialog.path())),
                    Line::default(),
                    Line::from(format!(
                        "[{}] Overwrite existing entries (Tab)",
                        if dialog.overwrite() { "x" } else { " " }
                    )),
                ];
                if let Some(error) = dialog.error() {
                    lines.push(Line::default());
                    lines.push(Line::styled(
                        error.to_string(),
                        Style::default().fg(self.theme.modal_error),
                    ));
                }
                lines.push(Line::default());
                lines.push(Line::from("[Enter] Import  [Esc] Cancel"));

                let paragraph = Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .block(block);
                frame.render_widget(paragraph, modal_area);
            }

            Some(ModalKind::About) => {
                let modal_area = centered_rect(50, 40, area);
                frame.render_widget(Clear, modal_area);

                let block = Block::default()
                    .title(" About ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.modal_info));

                let mut lines = vec![
                    Line::styled(
                        format!("{} {}", crate::APP_NAME, crate::VERSION),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Line::default(),
                ];
                match self.shell.modals().about().version() {
                    Some(version) => {
                        lines.push(Line::from(format!("Agent:    {}", version.instance_id)));
                        lines.push(Line::from(format!("Version:  {}", version.version)));
                        lines.push(Line::from(format!("Commit:   {}", version.commit)));
                        lines.push(Line::from(format!("Branch:   {}", version.branch)));
                        lines.push(Line::from(format!("Build:    {}", version.build_stamp)));
                    }
                    None => lines.push(Line::from("Agent version not available yet")),
                }
                lines.push(Line::default());
                lines.push(Line::from("Press any key to close."));

                frame.render_widget(Paragraph::new(lines).block(block), modal_area);
            }

            None => {}
        }
    }

    fn render_overlay(&mut self, frame: &mut Frame, area: Rect) {
        if let BlockingState::Blocking { message, since } = self.shell.blocking().state() {
            let overlay = BlockingOverlay::new(message, *since, &self.theme);
            frame.render_stateful_widget(overlay, area, &mut self.ui_state.throbber);
        }
    }

    fn render_alert(&self, frame: &mut Frame, area: Rect) {
        let Some(message) = self.ui_state.alerts.front() else {
            return;
        };

        let modal_area = centered_rect(60, 20, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.modal_error));

        let pending = self.ui_state.alerts.len() - 1;
        let text = if pending > 0 {
            format!("{}\n\nPress any key to close ({} more).", message, pending)
        } else {
            format!("{}\n\nPress any key to close.", message)
        };
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
        frame.render_widget(paragraph, modal_area);
    }
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::shell::{ConfigService, RELOAD_MESSAGE, SessionService, VersionInfo, Viewable};
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use serde_json::Value;

    /// Agent whose calls never settle
    struct SilentAgent;

    #[async_trait]
    impl SessionService for SilentAgent {
        async fn fetch_info(&self) -> std::result::Result<VersionInfo, ServiceError> {
            futures::future::pending().await
        }

        async fn logout(&self) -> std::result::Result<(), ServiceError> {
            futures::future::pending().await
        }

        async fn reload_config(&self) -> std::result::Result<String, ServiceError> {
            futures::future::pending().await
        }
    }

    #[async_trait]
    impl ConfigService for SilentAgent {
        async fn list_entries(&self, _path: &str) -> std::result::Result<Vec<Value>, ServiceError> {
            futures::future::pending().await
        }

        async fn import_config(
            &self,
            _document: Value,
            _overwrite: bool,
        ) -> std::result::Result<String, ServiceError> {
            futures::future::pending().await
        }
    }

    fn app() -> App {
        App::new(Config::default(), Arc::new(SilentAgent)).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        let modifiers = match code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => KeyModifiers::SHIFT,
            _ => KeyModifiers::NONE,
        };
        app.handle_key(KeyEvent::new(code, modifiers));
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);

        // Should be roughly centered
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < area.width);
        assert!(centered.height < area.height);
    }

    #[test]
    fn test_app_ui_state_default() {
        let state = AppUiState::default();
        assert!(state.rows.is_empty());
        assert_eq!(state.focused_pane, FocusedPane::Menu);
        assert!(state.alerts.is_empty());
        assert!(state.exit.is_none());
    }

    #[tokio::test]
    async fn test_initial_frame_shows_menu_and_runtime_panel() {
        let mut app = app();
        assert_eq!(app.ui_state.menu_state.selected(), Some(0));

        let text = screen_text(&mut app);
        assert!(text.contains("Server Config"));
        assert!(text.contains("HMC Servers"));
        assert!(text.contains("Agent status"));
        assert!(text.contains("agent unavailable"));
    }

    #[tokio::test]
    async fn test_overlay_swallows_input_until_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.shell.blocking().is_blocking());
        assert!(app.screen_contains(RELOAD_MESSAGE));

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.ui_state.menu_state.selected(), Some(0));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.shell.modals().visible(), None);

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.ui_state.exit, Some(ShellExit::Quit));
    }

    #[tokio::test]
    async fn test_select_toggles_group_and_mounts_view() {
        let mut app = app();

        // Row 0 is the "Runtime" group header
        press(&mut app, KeyCode::Enter);
        let collapsed_rows = app.ui_state.rows.len();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui_state.rows.len(), collapsed_rows + 1);

        // Runtime, Agent status, Server Config, Influx DB Servers
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.shell.views().active_key().map(|k| k.as_str()),
            Some(crate::views::INFLUX_SERVERS)
        );
        assert_eq!(app.ui_state.focused_pane, FocusedPane::Content);
        assert!(app.screen_contains("Loading..."));
    }

    #[tokio::test]
    async fn test_alert_closes_on_any_key() {
        let mut app = app();
        app.handle_event(AppEvent::Alert("Reload failed: agent busy".to_string()));
        assert!(app.screen_contains("Reload failed: agent busy"));

        press(&mut app, KeyCode::Char('x'));
        assert!(app.ui_state.alerts.is_empty());
        assert_eq!(app.shell.modals().visible(), None);
    }

    #[tokio::test]
    async fn test_alerts_are_shown_one_after_another() {
        let mut app = app();
        app.handle_event(AppEvent::Alert("connection refused".to_string()));
        app.handle_event(AppEvent::Alert("timeout".to_string()));

        assert!(app.screen_contains("connection refused"));
        assert!(app.screen_contains("(1 more)"));
        assert!(!app.screen_contains("timeout"));

        press(&mut app, KeyCode::Enter);
        assert!(app.screen_contains("timeout"));
        assert!(!app.screen_contains("connection refused"));

        // The dismissing keys never reach the menu
        press(&mut app, KeyCode::Enter);
        assert!(app.ui_state.alerts.is_empty());
        assert_eq!(app.ui_state.rows.len(), 5);
    }

    #[tokio::test]
    async fn test_page_keys_scroll_mounted_section() {
        let mut app = app();
        app.shell.click_menu_at(1, 1);
        let entries = (0..40)
            .map(|i| serde_json::json!({"ID": format!("hmc{:02}", i)}))
            .collect();
        app.shell
            .views_mut()
            .active_mut()
            .unwrap()
            .view_mut()
            .load(Ok(entries));
        assert!(app.screen_contains("hmc00"));

        press(&mut app, KeyCode::PageDown);
        let text = screen_text(&mut app);
        assert!(!text.contains("hmc00"));
        assert!(text.contains("hmc30"));

        press(&mut app, KeyCode::PageUp);
        assert!(app.screen_contains("hmc00"));
    }

    #[tokio::test]
    async fn test_import_dialog_takes_text() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.shell.modals().visible(), Some(ModalKind::Import));

        // Letters bound to commands are typed into the dialog
        for c in "r.json".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.shell.modals().import().path(), "r.json");
        assert!(app.shell.modals().import().overwrite());
        assert!(!app.shell.blocking().is_blocking());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.shell.modals().visible(), None);
    }

    #[tokio::test]
    async fn test_signed_out_event_exits() {
        let mut app = app();
        app.handle_event(AppEvent::RuntimeRefresh);
        assert!(app.ui_state.runtime.refreshing);

        app.handle_event(AppEvent::Tick);
        assert!(!app.ui_state.runtime.refreshing);

        app.handle_event(AppEvent::SignedOut);
        assert_eq!(app.ui_state.exit, Some(ShellExit::SignedOut));
    }

    impl App {
        fn screen_contains(&mut self, needle: &str) -> bool {
            screen_text(self).contains(needle)
        }
    }
}
