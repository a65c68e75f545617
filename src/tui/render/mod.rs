pub mod takeover;
pub mod terminal_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::text::{Line, Span};
use ratatui::widgets::Block;

use crate::cli::output::OutputLine;

use super::app::App;
use super::mode::Mode;
use super::theme::Theme;

/// Draw the active mode
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    frame.render_widget(Block::default().style(app.theme.base()), area);

    match app.modes.mode() {
        Mode::Focus(countdown) => takeover::render_focus(frame, app, countdown, area),
        Mode::Break(countdown) => takeover::render_break(frame, app, countdown, area),
        Mode::CommandLine | Mode::ThemePicker { .. } => {
            terminal_view::render_terminal(frame, app, area)
        }
    }
}

/// Styled ratatui line for an output line
pub(super) fn to_line(line: &OutputLine, theme: &Theme) -> Line<'static> {
    Line::from(
        line.spans
            .iter()
            .map(|span| Span::styled(span.text.clone(), theme.tone_style(span.tone)))
            .collect::<Vec<_>>(),
    )
}
