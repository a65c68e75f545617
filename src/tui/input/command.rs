use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

/// Rows moved by PageUp/PageDown
const PAGE: usize = 10;

pub(super) fn handle_command_line(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Enter) => app.submit(),
        (_, KeyCode::Tab) => app.complete(),

        // History recall
        (_, KeyCode::Up) => app.history_previous(),
        (_, KeyCode::Down) => app.history_next(),

        // Scrollback
        (_, KeyCode::PageUp) => app.scroll_up(PAGE),
        (_, KeyCode::PageDown) => app.scroll_down(PAGE),

        // Ctrl+C clears a line, or quits on an empty one
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            if app.editor.is_empty() {
                app.should_quit = true;
            } else {
                app.editor.take();
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('d')) if app.editor.is_empty() => {
            app.should_quit = true;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => {
            app.scrollback.clear();
            app.scroll = 0;
        }

        // Cursor movement
        (KeyModifiers::CONTROL, KeyCode::Char('a')) | (_, KeyCode::Home) => app.editor.home(),
        (KeyModifiers::CONTROL, KeyCode::Char('e')) | (_, KeyCode::End) => app.editor.end(),
        (_, KeyCode::Left) => app.editor.left(),
        (_, KeyCode::Right) => app.editor.right(),

        // Deletion
        (KeyModifiers::CONTROL, KeyCode::Char('w')) | (KeyModifiers::ALT, KeyCode::Backspace) => {
            app.editor.delete_word_before();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.editor.kill_to_start(),
        (KeyModifiers::CONTROL, KeyCode::Char('k')) => app.editor.kill_to_end(),
        (_, KeyCode::Backspace) => app.editor.backspace(),
        (_, KeyCode::Delete) => app.editor.delete(),

        // Type character
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => app.editor.insert_char(c),

        _ => return,
    }

    // Any key but Tab dismisses the candidate list
    if key.code != KeyCode::Tab {
        app.candidates.clear();
    }
}
