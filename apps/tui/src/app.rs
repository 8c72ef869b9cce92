//! Core TUI application state and event loop.

use std::io;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tracing::debug;

use worldbook_core::{
    CLEARED_LABEL, ConversionHandler, EXAMPLE_INPUT, EXAMPLE_LOADED_LABEL, Orchestrator,
    READY_LABEL, completion_label,
};
use worldbook_shared::{AppConfig, ConvertOptions, WorldBookError};

use crate::screens::{ConvertScreen, EntriesScreen, ScreenId};
use crate::widgets::{centered_rect, draw_popup, status_bar};

/// Modal message waiting to be acknowledged.
pub(crate) struct Popup {
    pub title: &'static str,
    pub message: String,
}

/// View state. Kept apart from the orchestrator so the orchestrator can
/// deliver conversion events into it.
pub(crate) struct Ui {
    /// Currently active screen tab.
    pub active_tab: usize,
    /// Status message shown in bottom bar.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Error or prompt awaiting dismissal.
    pub popup: Option<Popup>,
    pub convert: ConvertScreen,
    pub entries: EntriesScreen,
}

impl Ui {
    fn new() -> Self {
        Self {
            active_tab: 0,
            status: READY_LABEL.to_string(),
            show_help: false,
            popup: None,
            convert: ConvertScreen::new(),
            entries: EntriesScreen::new(),
        }
    }

    fn active_screen(&self) -> ScreenId {
        ScreenId::ALL[self.active_tab]
    }

    fn is_editing(&self) -> bool {
        self.active_screen() == ScreenId::Convert && self.convert.is_editing()
    }
}

impl ConversionHandler for Ui {
    fn on_status(&mut self, label: &str) {
        self.status = label.to_string();
    }

    fn on_success(&mut self, json: String, entry_count: usize) {
        self.entries.load(&json);
        self.convert.set_output(json);
        self.status = completion_label(entry_count);
    }

    fn on_failure(&mut self, message: &str) {
        self.popup = Some(Popup {
            title: "错误",
            message: message.to_string(),
        });
    }
}

/// Application state.
pub(crate) struct App {
    orchestrator: Orchestrator,
    pub ui: Ui,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    pub(crate) fn new(options: ConvertOptions) -> Self {
        Self {
            orchestrator: Orchestrator::new(options),
            ui: Ui::new(),
            should_quit: false,
        }
    }

    /// Hand the current input to the orchestrator. Ignored while a
    /// conversion is already running.
    fn start_conversion(&mut self) {
        if self.orchestrator.is_busy() {
            debug!("conversion already running, ignoring request");
            return;
        }

        let raw = self.ui.convert.input().to_string();
        if let Err(err) = self.orchestrator.request_conversion(raw) {
            let title = match err {
                WorldBookError::EmptyInput => "提示",
                _ => "错误",
            };
            self.ui.popup = Some(Popup {
                title,
                message: err.to_string(),
            });
        }
    }

    /// Deliver queued conversion events on this (the UI) thread.
    pub(crate) fn pump(&mut self) {
        self.orchestrator.dispatch_pending(&mut self.ui);
    }

    fn load_example(&mut self) {
        self.ui.convert.set_input(EXAMPLE_INPUT);
        self.ui.active_tab = 0;
        self.ui.status = EXAMPLE_LOADED_LABEL.to_string();
    }

    fn clear(&mut self) {
        self.ui.convert.clear();
        self.ui.entries.clear();
        self.ui.status = CLEARED_LABEL.to_string();
    }
}

/// Set up the terminal, run the event loop, then restore the terminal.
pub(crate) fn run(config: &AppConfig) -> Result<()> {
    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let tick = Duration::from_millis(config.tui.tick_ms);
    let result = run_app(&mut terminal, ConvertOptions::from(config), tick);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    options: ConvertOptions,
    tick: Duration,
) -> Result<()> {
    let mut app = App::new(options);

    loop {
        app.pump();
        terminal.draw(|f| draw(f, &app))?;

        // Poll with a short timeout so worker results show up promptly
        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    // Quit is always available
    if matches!(code, KeyCode::Char('q') | KeyCode::Char('c')) && ctrl {
        app.should_quit = true;
        return;
    }

    // A popup is modal until acknowledged
    if app.ui.popup.is_some() {
        if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.ui.popup = None;
        }
        return;
    }

    let editing = app.ui.is_editing();
    match code {
        KeyCode::Char('r') if ctrl => {
            app.start_conversion();
            return;
        }
        KeyCode::F(5) => {
            app.start_conversion();
            return;
        }
        KeyCode::Char('e') if ctrl => {
            app.load_example();
            return;
        }
        KeyCode::Char('l') if ctrl => {
            app.clear();
            return;
        }
        KeyCode::Char('q') if !editing => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !editing => {
            app.ui.show_help = !app.ui.show_help;
            return;
        }
        KeyCode::Esc if app.ui.show_help => {
            app.ui.show_help = false;
            return;
        }
        // Tab navigation with number keys
        KeyCode::Char(c @ '1'..='2') if !editing => {
            app.ui.active_tab = (c as usize) - ('1' as usize);
            return;
        }
        KeyCode::Tab if !editing => {
            app.ui.active_tab = (app.ui.active_tab + 1) % ScreenId::ALL.len();
            return;
        }
        KeyCode::BackTab if !editing => {
            app.ui.active_tab = if app.ui.active_tab == 0 {
                ScreenId::ALL.len() - 1
            } else {
                app.ui.active_tab - 1
            };
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.ui.show_help {
        app.ui.show_help = false;
        return;
    }

    // Delegate to current screen
    match app.ui.active_screen() {
        ScreenId::Convert => app.ui.convert.handle_key(code, modifiers),
        ScreenId::Entries => app.ui.entries.handle_key(code, modifiers),
    }
}

fn draw(f: &mut Frame, app: &App) {
    let ui = &app.ui;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Tab bar
    let tab_titles: Vec<Line> = ScreenId::ALL
        .iter()
        .map(|s| Line::from(format!("{s}")))
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 长天快速世界书 - XML转Tavo "),
        )
        .select(ui.active_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, chunks[0]);

    // Content area, delegated to the active screen
    match ui.active_screen() {
        ScreenId::Convert => ui.convert.draw(f, chunks[1]),
        ScreenId::Entries => ui.entries.draw(f, chunks[1]),
    }

    // Status bar
    let status = if app.orchestrator.is_busy() {
        format!("⏳ {}", ui.status)
    } else {
        ui.status.clone()
    };
    f.render_widget(status_bar(&status), chunks[2]);

    if ui.show_help {
        draw_help_overlay(f);
    }

    if let Some(popup) = &ui.popup {
        draw_popup(f, popup.title, &popup.message);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  Ctrl-R / F5  Convert to Tavo"),
        Line::from("  Ctrl-E       Load example"),
        Line::from("  Ctrl-L       Clear input and output"),
        Line::from("  1-2          Switch to screen"),
        Line::from("  Tab/S-Tab    Next/previous screen (or pane)"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-Q   Quit"),
        Line::from(""),
        Line::from("Screen-specific:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  Enter        Edit input / newline"),
        Line::from("  Esc          Leave the input pane"),
        Line::from("  ↑/↓ PgUp/Dn  Scroll output / select entry"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (press any key to close) ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}
