use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::cli::output::{OutputLine, Tone, echo_line};
use crate::tui::app::App;
use crate::tui::wrap::{hard_wrap, wrap_output, wrap_output_line};
use crate::util::unicode::display_width;

use super::to_line;

/// Render the scrollback with the input line following the last output,
/// like a terminal. While the theme picker is open, the picker row takes
/// the place of the input line.
pub fn render_terminal(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let height = area.height as usize;

    let mut rows = wrap_output(&app.scrollback, width);
    let input_start = rows.len();
    let picker = app.modes.picker_line();
    match &picker {
        Some(line) => rows.extend(wrap_output_line(
            &OutputLine::styled(line.as_str(), Tone::Heading),
            width,
        )),
        None => rows.extend(hard_wrap(&echo_line(&app.prompt(), app.editor.text()), width)),
    }
    if !app.candidates.is_empty() {
        let candidates = OutputLine::styled(app.candidates.join("  "), Tone::Dim);
        rows.extend(wrap_output_line(&candidates, width));
    }

    let (start, end) = visible_window(rows.len(), height, app.scroll);
    let lines: Vec<Line> = rows[start..end]
        .iter()
        .map(|row| to_line(row, &app.theme))
        .collect();
    frame.render_widget(Paragraph::new(lines).style(app.theme.base()), area);

    if picker.is_none() && width > 0 {
        let col = display_width(&app.prompt()) + app.editor.cursor_column();
        let row = input_start + col / width;
        if row >= start && row < end {
            frame.set_cursor_position((
                area.x + (col % width) as u16,
                area.y + (row - start) as u16,
            ));
        }
    }
}

/// Rows `[start, end)` shown when scrolled `scroll` rows up from the bottom
pub fn visible_window(total: usize, height: usize, scroll: usize) -> (usize, usize) {
    let max_scroll = total.saturating_sub(height);
    let end = total - scroll.min(max_scroll);
    (end.saturating_sub(height), end)
}
