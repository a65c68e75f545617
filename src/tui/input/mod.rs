mod command;
mod editor;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::App;

use command::handle_command_line;
pub use editor::LineEditor;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Takeover modes own every key until they end
    if app.modes.is_takeover() {
        let transition = app.modes.handle_key(key);
        app.apply_transition(transition);
        return;
    }

    handle_command_line(app, key);
}

/// Handle a bracketed paste event. Only the command line accepts text.
pub fn handle_paste(app: &mut App, text: &str) {
    if app.modes.is_takeover() || text.is_empty() {
        return;
    }
    app.editor.insert_str(text);
    app.candidates.clear();
}
