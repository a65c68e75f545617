use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::cli::output::{
    OutputLine, Tone, banner, echo_line, error_line, render_error, render_result, system_line,
};
use crate::engine::{CommandResult, Completion, Effect};
use crate::io::paths;
use crate::logging;
use crate::runtime::{Executed, Runtime};

use super::alerts::{self, Alerts, TerminalAlerts};
use super::input::{self, LineEditor};
use super::mode::{ModeController, TimerKind, Transition};
use super::render;
use super::theme::Theme;

/// Scrollback is trimmed to this many lines
pub const SCROLLBACK_LIMIT: usize = 2000;
/// Longest the loop waits for input before re-checking timers
const IDLE_POLL: Duration = Duration::from_millis(250);
const TICK: Duration = Duration::from_secs(1);

/// Main application state
pub struct App {
    pub runtime: Runtime,
    pub modes: ModeController,
    pub editor: LineEditor,
    pub scrollback: Vec<OutputLine>,
    /// Rows scrolled up from the bottom
    pub scroll: usize,
    /// Tab candidates shown under the input line
    pub candidates: Vec<String>,
    pub theme: Theme,
    pub should_quit: bool,
    alerts: Box<dyn Alerts>,
    next_tick: Option<Instant>,
}

impl App {
    pub fn new(runtime: Runtime, alerts: Box<dyn Alerts>) -> Self {
        let theme = Theme::named(&runtime.session.theme);
        let mut app = App {
            runtime,
            modes: ModeController::new(),
            editor: LineEditor::new(),
            scrollback: Vec::new(),
            scroll: 0,
            candidates: Vec::new(),
            theme,
            should_quit: false,
            alerts,
            next_tick: None,
        };
        app.push_lines(banner());
        app
    }

    pub fn prompt(&self) -> String {
        self.runtime.session.prompt(&self.runtime.config.ui.prompt)
    }

    pub fn push_lines(&mut self, lines: impl IntoIterator<Item = OutputLine>) {
        self.scrollback.extend(lines);
        if self.scrollback.len() > SCROLLBACK_LIMIT {
            let excess = self.scrollback.len() - SCROLLBACK_LIMIT;
            self.scrollback.drain(..excess);
        }
        self.scroll = 0;
    }

    pub fn push_results(&mut self, results: &[CommandResult]) {
        for result in results {
            self.push_lines(render_result(result));
        }
    }

    /// Run the input line (Enter)
    pub fn submit(&mut self) {
        let line = self.editor.take();
        self.candidates.clear();
        let echo = echo_line(&self.prompt(), &line);
        self.push_lines([echo]);

        match self.runtime.execute(&line, Utc::now()) {
            Ok(Executed::Nothing) => {}
            Ok(Executed::Results(results)) => {
                self.push_results(&results);
                if self.runtime.chimes(&line) {
                    self.chime();
                }
            }
            Ok(Executed::Effect(effect)) => self.apply_effect(effect, Instant::now()),
            Err(e) => self.push_lines(render_error(&e)),
        }
        self.sync_theme();
    }

    fn apply_effect(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::Clear => {
                self.scrollback.clear();
                self.scroll = 0;
            }
            Effect::ThemePicker => {
                self.modes.open_theme_picker(&self.runtime.session.theme);
                self.push_lines([
                    OutputLine::styled("=== THEME SELECTION ===", Tone::Heading),
                    OutputLine::plain("Use Arrows to select, ENTER to confirm."),
                ]);
            }
            Effect::Focus { minutes, label } => {
                info!(minutes, label = %label, "focus started");
                self.modes.start_focus(minutes, &label);
                self.next_tick = Some(now + TICK);
            }
            Effect::Break { minutes } => {
                info!(minutes, "break started");
                self.modes.start_break(minutes);
                self.next_tick = Some(now + TICK);
            }
            Effect::Quit => self.should_quit = true,
            // The runtime carries these out before they reach the host
            Effect::Login { .. } | Effect::Logout | Effect::Sync => {}
        }
    }

    /// Act on a mode change and print its closing message
    pub fn apply_transition(&mut self, transition: Transition) {
        match &transition {
            Transition::None => return,
            Transition::ThemeApplied(name) => {
                self.runtime.session.set_theme(name);
                self.runtime.note_changes(Instant::now());
                self.sync_theme();
            }
            Transition::ThemeCancelled => {}
            Transition::TimerFinished { kind, label } => {
                self.next_tick = None;
                self.chime();
                let (title, body) = match kind {
                    TimerKind::Focus => alerts::focus_complete(label),
                    TimerKind::Break => alerts::break_complete(),
                };
                self.notify(title, &body);
            }
            Transition::TimerInterrupted(_) => self.next_tick = None,
        }
        if let Some(text) = transition.message() {
            self.push_lines([system_line(&text)]);
        }
    }

    fn chime(&mut self) {
        if self.runtime.session.sound_enabled {
            self.alerts.chime();
        }
    }

    fn notify(&mut self, title: &str, body: &str) {
        if self.runtime.session.notifications_enabled {
            if let Some(line) = self.alerts.notify(title, body) {
                self.push_lines([line]);
            }
        }
    }

    /// Follow the session theme after commands, hydration or the picker
    pub fn sync_theme(&mut self) {
        if self.theme.name != self.runtime.session.theme {
            self.theme = Theme::named(&self.runtime.session.theme);
        }
    }

    /// Tab
    pub fn complete(&mut self) {
        match self
            .runtime
            .engine
            .complete(self.editor.text(), &self.runtime.store)
        {
            Completion::None => self.candidates.clear(),
            Completion::Replace(line) => {
                self.editor.set(&line);
                self.candidates.clear();
            }
            Completion::Candidates(candidates) => self.candidates = candidates,
        }
    }

    pub fn history_previous(&mut self) {
        if let Some(line) = self.runtime.session.history.previous().map(str::to_string) {
            self.editor.set(&line);
        }
    }

    pub fn history_next(&mut self) {
        if let Some(line) = self.runtime.session.history.next().map(str::to_string) {
            self.editor.set(&line);
        }
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    /// Advance the countdown and flush due writes
    pub fn on_tick(&mut self, now: Instant) {
        while let Some(at) = self.next_tick {
            if now < at {
                break;
            }
            self.next_tick = Some(at + TICK);
            let transition = self.modes.tick();
            self.apply_transition(transition);
        }
        if let Err(e) = self.runtime.flush_if_due(now) {
            warn!(error = %e, "could not save");
            self.push_lines([error_line(&format!("Could not save: {}", e))]);
        }
    }

    /// How long the event loop may block before something is due
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        [self.next_tick, self.runtime.next_deadline()]
            .into_iter()
            .flatten()
            .map(|at| at.saturating_duration_since(now))
            .fold(IDLE_POLL, Duration::min)
    }
}

/// Run the interactive terminal
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = paths::data_dir(data_dir);
    logging::init_file(&dir)?;
    let runtime = Runtime::open(&dir)?;
    let mut app = App::new(runtime, Box::new(TerminalAlerts::new(io::stdout())));

    // Blocks until the remote answers for a remembered identity
    let startup = app.runtime.hydrate_on_start();
    app.push_results(&startup);
    app.sync_theme();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Flush before exit
    let saved = app.runtime.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;
    saved?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }
        app.on_tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
