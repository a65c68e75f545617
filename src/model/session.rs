use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A signed-in user. `uid` is opaque and keys the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

impl Identity {
    /// The part of the email before `@`, used in the prompt
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Most-recent-N command history with a recall cursor.
///
/// The cursor sits at `len()` while the user is typing a fresh line.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    limit: usize,
    cursor: usize,
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        CommandHistory {
            entries: VecDeque::new(),
            limit: limit.max(1),
            cursor: 0,
        }
    }

    pub fn from_entries(entries: Vec<String>, limit: usize) -> Self {
        let mut history = CommandHistory::new(limit);
        history.replace(entries);
        history
    }

    /// Append a submitted line, evicting the oldest past the limit
    pub fn push(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.entries.push_back(line.to_string());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Step back through history (Up)
    pub fn previous(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step forward (Down). Walking past the newest entry yields an empty line.
    pub fn next(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries.get(self.cursor).map(String::as_str)
        } else {
            self.cursor = self.entries.len();
            Some("")
        }
    }

    /// Swap in a new history (hydration). A cursor at the end stays at the
    /// end; a browsing cursor is kept but clamped.
    pub fn replace(&mut self, entries: Vec<String>) {
        let was_at_end = self.cursor >= self.entries.len();
        self.entries = entries.into_iter().collect();
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        if was_at_end || self.cursor > self.entries.len() {
            self.cursor = self.entries.len();
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Per-process settings and state that live outside the task store
#[derive(Debug, Clone)]
pub struct Session {
    pub history: CommandHistory,
    pub theme: String,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    pub identity: Option<Identity>,
    dirty: bool,
}

impl Session {
    pub fn new(theme: String, history_limit: usize) -> Self {
        Session {
            history: CommandHistory::new(history_limit),
            theme,
            sound_enabled: false,
            notifications_enabled: false,
            identity: None,
            dirty: false,
        }
    }

    /// Flag a change to a persisted session field
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return and reset the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn set_theme(&mut self, theme: &str) {
        if self.theme != theme {
            self.theme = theme.to_string();
            self.mark_dirty();
        }
    }

    pub fn set_sound(&mut self, enabled: bool) {
        if self.sound_enabled != enabled {
            self.sound_enabled = enabled;
            self.mark_dirty();
        }
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        if self.notifications_enabled != enabled {
            self.notifications_enabled = enabled;
            self.mark_dirty();
        }
    }

    pub fn record_command(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.history.push(line);
            self.mark_dirty();
        }
    }

    /// Prompt string: `name@zen > ` when signed in
    pub fn prompt(&self, default_prompt: &str) -> String {
        match &self.identity {
            Some(identity) => format!("{}@zen > ", identity.display_name()),
            None => default_prompt.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_capped_to_most_recent() {
        let mut history = CommandHistory::new(3);
        for line in ["a", "b", "c", "d"] {
            history.push(line);
        }
        assert_eq!(history.entries(), vec!["b", "c", "d"]);
        assert_eq!(history.cursor(), 3);
    }

    #[test]
    fn blank_lines_are_not_recorded() {
        let mut history = CommandHistory::new(5);
        history.push("   ");
        assert!(history.is_empty());
    }

    #[test]
    fn previous_and_next_walk_the_ring() {
        let mut history = CommandHistory::new(10);
        history.push("add one");
        history.push("list");

        assert_eq!(history.previous(), Some("list"));
        assert_eq!(history.previous(), Some("add one"));
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), Some("list"));
        // Past the newest entry: back to a fresh empty line
        assert_eq!(history.next(), Some(""));
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn replace_keeps_cursor_at_end() {
        let mut history = CommandHistory::from_entries(vec!["a".into()], 10);
        history.replace(vec!["x".into(), "y".into(), "z".into()]);
        assert_eq!(history.cursor(), 3);
    }

    #[test]
    fn replace_clamps_browsing_cursor() {
        let mut history =
            CommandHistory::from_entries(vec!["a".into(), "b".into(), "c".into(), "d".into()], 10);
        history.previous();
        history.previous();
        history.previous();
        assert_eq!(history.cursor(), 1);
        history.replace(vec!["only".into()]);
        assert_eq!(history.cursor(), 1);

        let mut history = CommandHistory::from_entries(vec!["a".into(), "b".into()], 10);
        history.previous();
        assert_eq!(history.cursor(), 1);
        history.replace(vec![]);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn prompt_uses_email_local_part() {
        let mut session = Session::new("green".into(), 50);
        assert_eq!(session.prompt("> "), "> ");
        session.identity = Some(Identity {
            uid: "abc".into(),
            email: "ada@example.com".into(),
        });
        assert_eq!(session.prompt("> "), "ada@zen > ");
    }

    #[test]
    fn set_theme_marks_dirty_only_on_change() {
        let mut session = Session::new("green".into(), 50);
        session.set_theme("green");
        assert!(!session.take_dirty());
        session.set_theme("amber");
        assert!(session.take_dirty());
        assert!(!session.take_dirty());
    }
}
