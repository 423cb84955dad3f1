//! TUI application state and event loop.
//!
//! The left pane mirrors the web sidebar: a focusable list of fields edited
//! with the arrow keys. Every settings change re-renders through the same
//! [`MonitorSession`] the web server uses, so the monitoring flag behaves
//! identically in both front ends.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use compliancewatch_core::{
    Action, CONFIDENCE_MAX, CONFIDENCE_MIN, DataSource, MonitorSession, MonitoringConfig,
    SEVERITY_MAX, SEVERITY_MIN, Screen, Synthesizer, Tab,
};

const CONFIDENCE_STEP: u8 = 5;

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// Sidebar control with keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Drug,
    Sources,
    Window,
    Severity,
    Confidence,
    Start,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Self::Drug,
        Self::Sources,
        Self::Window,
        Self::Severity,
        Self::Confidence,
        Self::Start,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    config: MonitoringConfig,
    session: MonitorSession,
    synth: Synthesizer,
    screen: Screen,
    focus: Field,
    /// Highlighted entry in the source checklist.
    source_cursor: usize,
    tab: Tab,
    running: bool,
    report_dir: PathBuf,
    /// Last message for the status bar (saved report, errors).
    status: Option<String>,
}

impl App {
    pub fn new(config: MonitoringConfig, synth: Synthesizer, report_dir: PathBuf) -> Self {
        Self {
            config,
            session: MonitorSession::new(Utc::now()),
            synth,
            screen: Screen::Welcome,
            focus: Field::default(),
            source_cursor: 0,
            tab: Tab::default(),
            running: true,
            report_dir,
            status: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        if let Some(status) = &self.status {
            println!("{status}");
        }

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.running = false,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter => self.render(Action::Start),
            _ if self.focus == Field::Drug => self.edit_drug(key),
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                if let Some(tab) = Tab::from_index(idx) {
                    self.tab = tab;
                }
            }
            KeyCode::Char('r') => self.render(Action::Refresh),
            KeyCode::Char('s') => self.save_report(),
            KeyCode::Left => self.adjust(false),
            KeyCode::Right => self.adjust(true),
            KeyCode::Char(' ') => match self.focus {
                Field::Sources => {
                    self.config
                        .toggle_source(DataSource::ALL[self.source_cursor]);
                    self.render(Action::Refresh);
                }
                Field::Start => self.render(Action::Start),
                _ => {}
            },
            _ => {}
        }
    }

    fn edit_drug(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                self.config.drug_name.push(c);
            }
            KeyCode::Backspace => {
                self.config.drug_name.pop();
            }
            _ => {}
        }
    }

    /// Left/right on the focused control.
    fn adjust(&mut self, up: bool) {
        match self.focus {
            Field::Sources => {
                let n = DataSource::ALL.len();
                self.source_cursor = if up {
                    (self.source_cursor + 1) % n
                } else {
                    (self.source_cursor + n - 1) % n
                };
                return;
            }
            Field::Window => {
                self.config.time_window = if up {
                    self.config.time_window.next()
                } else {
                    self.config.time_window.prev()
                };
            }
            Field::Severity => {
                let v = self.config.severity_threshold;
                self.config.severity_threshold = if up {
                    (v + 1).min(SEVERITY_MAX)
                } else {
                    v.saturating_sub(1).max(SEVERITY_MIN)
                };
            }
            Field::Confidence => {
                let v = self.config.confidence_threshold;
                self.config.confidence_threshold = if up {
                    (v + CONFIDENCE_STEP).min(CONFIDENCE_MAX)
                } else {
                    v.saturating_sub(CONFIDENCE_STEP).max(CONFIDENCE_MIN)
                };
            }
            Field::Drug | Field::Start => return,
        }
        self.render(Action::Refresh);
    }

    fn render(&mut self, action: Action) {
        let drug = self.config.drug_name.trim().to_string();
        self.config.drug_name = drug;
        match self
            .session
            .render(&self.config, action, &mut self.synth, Utc::now())
        {
            Ok(screen) => {
                self.screen = screen;
                self.status = None;
            }
            Err(e) => {
                log::debug!("render rejected: {e}");
                self.status = Some(format!("Error: {e}"));
            }
        }
    }

    fn save_report(&mut self) {
        let Some(view) = self.screen.view() else {
            self.status = Some("Start monitoring to generate a report".to_string());
            return;
        };
        self.status = Some(match view.report.write_to_dir(&self.report_dir) {
            Ok(path) => format!("Report saved to {}", path.display()),
            Err(e) => {
                log::warn!(
                    "could not save report into {}: {e}",
                    self.report_dir.display()
                );
                format!("Error: could not save report: {e}")
            }
        });
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn source_cursor(&self) -> usize {
        self.source_cursor
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_monitoring(&self) -> bool {
        self.session.monitoring
    }

    pub fn renders(&self) -> u64 {
        self.session.renders
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.running
    }
}
