use crossterm::event::{KeyCode, KeyEvent};

use crate::model::config::THEME_NAMES;

/// Seconds per box-breathing phase
pub const BREATH_PHASE_SECS: u64 = 4;
pub const BREATH_PHASES: [&str; 4] = ["INHALE", "HOLD", "EXHALE", "WAIT"];
/// Caption shown during a break
pub const BREAK_CAPTION: &str = "RELAX & BREATHE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Focus,
    Break,
}

/// A one-second-resolution countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub label: String,
    pub total_secs: u64,
    pub remaining_secs: u64,
}

impl Countdown {
    pub fn new(minutes: u32, label: impl Into<String>) -> Self {
        let total_secs = u64::from(minutes) * 60;
        Countdown {
            label: label.into(),
            total_secs,
            remaining_secs: total_secs,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs - self.remaining_secs
    }

    /// `MM:SS`
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    /// Advance one second. Returns true once the countdown reaches zero.
    pub fn tick(&mut self) -> bool {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs == 0
    }
}

/// Breathing phase for `elapsed` seconds into a break
pub fn breath_phase(elapsed: u64) -> &'static str {
    let index = (elapsed / BREATH_PHASE_SECS) % BREATH_PHASES.len() as u64;
    BREATH_PHASES[index as usize]
}

/// Lung fill from 0 (empty) to `BREATH_PHASE_SECS` (full)
pub fn breath_level(elapsed: u64) -> u64 {
    let within = elapsed % BREATH_PHASE_SECS;
    match breath_phase(elapsed) {
        "INHALE" => within,
        "HOLD" => BREATH_PHASE_SECS,
        "EXHALE" => BREATH_PHASE_SECS - within,
        _ => 0,
    }
}

/// Which interaction mode owns the keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    CommandLine,
    ThemePicker { index: usize },
    Focus(Countdown),
    Break(Countdown),
}

/// What a key press or tick did to the mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    None,
    ThemeApplied(String),
    ThemeCancelled,
    TimerFinished { kind: TimerKind, label: String },
    TimerInterrupted(TimerKind),
}

impl Transition {
    /// The system message printed on returning to the command line
    pub fn message(&self) -> Option<String> {
        let text = match self {
            Transition::None => return None,
            Transition::ThemeApplied(name) => format!("Theme changed to \"{}\".", name),
            Transition::ThemeCancelled => "Theme change cancelled.".into(),
            Transition::TimerFinished {
                kind: TimerKind::Focus,
                ..
            } => "Time's up. Good work.".into(),
            Transition::TimerFinished {
                kind: TimerKind::Break,
                ..
            } => "Break over. Ready to focus?".into(),
            Transition::TimerInterrupted(TimerKind::Focus) => "Focus mode interrupted.".into(),
            Transition::TimerInterrupted(TimerKind::Break) => "Break interrupted.".into(),
        };
        Some(text)
    }
}

/// Exactly one mode is active at a time. Every mode other than the command
/// line is a takeover: it consumes all keys until it ends.
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController {
    pub fn new() -> Self {
        ModeController {
            mode: Mode::CommandLine,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_takeover(&self) -> bool {
        self.mode != Mode::CommandLine
    }

    pub fn has_timer(&self) -> bool {
        matches!(self.mode, Mode::Focus(_) | Mode::Break(_))
    }

    /// Open the picker on the current theme (or the first one)
    pub fn open_theme_picker(&mut self, current: &str) {
        let index = THEME_NAMES.iter().position(|t| *t == current).unwrap_or(0);
        self.mode = Mode::ThemePicker { index };
    }

    pub fn start_focus(&mut self, minutes: u32, label: &str) {
        self.mode = Mode::Focus(Countdown::new(minutes, label));
    }

    pub fn start_break(&mut self, minutes: u32) {
        self.mode = Mode::Break(Countdown::new(minutes, BREAK_CAPTION));
    }

    /// Route a key to the active takeover. The command line is handled by
    /// the line editor, so keys there yield `Transition::None`.
    pub fn handle_key(&mut self, key: KeyEvent) -> Transition {
        match &mut self.mode {
            Mode::CommandLine => Transition::None,
            Mode::ThemePicker { index } => {
                let count = THEME_NAMES.len();
                match key.code {
                    KeyCode::Up | KeyCode::Left => {
                        *index = (*index + count - 1) % count;
                        Transition::None
                    }
                    KeyCode::Down | KeyCode::Right => {
                        *index = (*index + 1) % count;
                        Transition::None
                    }
                    KeyCode::Enter => {
                        let name = THEME_NAMES[*index].to_string();
                        self.mode = Mode::CommandLine;
                        Transition::ThemeApplied(name)
                    }
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                        self.mode = Mode::CommandLine;
                        Transition::ThemeCancelled
                    }
                    _ => Transition::None,
                }
            }
            Mode::Focus(_) | Mode::Break(_) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                    let kind = self.timer_kind().unwrap_or(TimerKind::Focus);
                    self.mode = Mode::CommandLine;
                    Transition::TimerInterrupted(kind)
                }
                _ => Transition::None,
            },
        }
    }

    /// One second has passed
    pub fn tick(&mut self) -> Transition {
        let kind = self.timer_kind();
        let finished = match &mut self.mode {
            Mode::Focus(countdown) | Mode::Break(countdown) => {
                countdown.tick().then(|| countdown.label.clone())
            }
            _ => None,
        };
        match (finished, kind) {
            (Some(label), Some(kind)) => {
                self.mode = Mode::CommandLine;
                Transition::TimerFinished { kind, label }
            }
            _ => Transition::None,
        }
    }

    fn timer_kind(&self) -> Option<TimerKind> {
        match self.mode {
            Mode::Focus(_) => Some(TimerKind::Focus),
            Mode::Break(_) => Some(TimerKind::Break),
            _ => None,
        }
    }

    /// Picker row with the selection in brackets, while the picker is open
    pub fn picker_line(&self) -> Option<String> {
        let Mode::ThemePicker { index } = self.mode else {
            return None;
        };
        let items: Vec<String> = THEME_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == index {
                    format!("[ {} ]", name.to_uppercase())
                } else {
                    format!("  {}  ", name)
                }
            })
            .collect();
        Some(items.join("   "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn picker_wraps_both_ways() {
        let mut modes = ModeController::new();
        modes.open_theme_picker("green");
        modes.handle_key(key(KeyCode::Up));
        assert_eq!(modes.mode(), &Mode::ThemePicker { index: 2 });
        modes.handle_key(key(KeyCode::Right));
        modes.handle_key(key(KeyCode::Down));
        assert_eq!(modes.mode(), &Mode::ThemePicker { index: 1 });
        assert_eq!(
            modes.handle_key(key(KeyCode::Enter)),
            Transition::ThemeApplied("amber".into())
        );
        assert!(!modes.is_takeover());
    }

    #[test]
    fn picker_starts_on_current_theme() {
        let mut modes = ModeController::new();
        modes.open_theme_picker("cyan");
        assert_eq!(
            modes.picker_line().unwrap(),
            "  green       amber     [ CYAN ]"
        );
        modes.open_theme_picker("unknown");
        assert_eq!(modes.mode(), &Mode::ThemePicker { index: 0 });
    }

    #[test]
    fn picker_cancel_keys() {
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')] {
            let mut modes = ModeController::new();
            modes.open_theme_picker("green");
            assert_eq!(modes.handle_key(key(code)), Transition::ThemeCancelled);
            assert_eq!(modes.mode(), &Mode::CommandLine);
        }
    }

    #[test]
    fn timers_ignore_other_keys() {
        let mut modes = ModeController::new();
        modes.start_focus(1, "write");
        assert_eq!(modes.handle_key(key(KeyCode::Enter)), Transition::None);
        assert_eq!(modes.handle_key(key(KeyCode::Char('x'))), Transition::None);
        assert!(modes.has_timer());
        assert_eq!(
            modes.handle_key(key(KeyCode::Char('Q'))),
            Transition::TimerInterrupted(TimerKind::Focus)
        );
        assert!(!modes.has_timer());
    }

    #[test]
    fn countdown_expires_at_zero() {
        let mut modes = ModeController::new();
        modes.start_break(1);
        for _ in 0..59 {
            assert_eq!(modes.tick(), Transition::None);
        }
        let Mode::Break(countdown) = modes.mode() else {
            panic!("expected break");
        };
        assert_eq!(countdown.clock(), "00:01");
        assert_eq!(
            modes.tick(),
            Transition::TimerFinished {
                kind: TimerKind::Break,
                label: BREAK_CAPTION.into()
            }
        );
        assert_eq!(modes.mode(), &Mode::CommandLine);
        assert_eq!(modes.tick(), Transition::None);
    }

    #[test]
    fn countdown_clock() {
        let mut c = Countdown::new(25, "x");
        assert_eq!(c.clock(), "25:00");
        c.tick();
        assert_eq!(c.clock(), "24:59");
        assert_eq!(c.elapsed_secs(), 1);
    }

    #[test]
    fn breathing_cycles_every_sixteen_seconds() {
        assert_eq!(breath_phase(0), "INHALE");
        assert_eq!(breath_phase(4), "HOLD");
        assert_eq!(breath_phase(9), "EXHALE");
        assert_eq!(breath_phase(15), "WAIT");
        assert_eq!(breath_phase(16), "INHALE");
        assert_eq!(breath_level(3), 3);
        assert_eq!(breath_level(5), 4);
        assert_eq!(breath_level(9), 3);
        assert_eq!(breath_level(13), 0);
    }

    #[test]
    fn end_messages() {
        assert_eq!(
            Transition::TimerFinished {
                kind: TimerKind::Focus,
                label: "x".into()
            }
            .message()
            .unwrap(),
            "Time's up. Good work."
        );
        assert_eq!(
            Transition::TimerInterrupted(TimerKind::Break).message().unwrap(),
            "Break interrupted."
        );
        assert_eq!(Transition::None.message(), None);
    }
}
