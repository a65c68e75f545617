use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use crate::cli::output::{OutputLine, Tone};
use crate::tui::app::App;
use crate::tui::mode::{Countdown, breath_level, breath_phase};

use super::to_line;

const EXIT_HINT: &str = "press q to exit";

/// Focus screen: what's being worked on and the time left
pub fn focus_lines(countdown: &Countdown) -> Vec<OutputLine> {
    vec![
        OutputLine::styled(countdown.label.as_str(), Tone::Heading),
        OutputLine::blank(),
        OutputLine::styled(countdown.clock(), Tone::System),
        OutputLine::blank(),
        OutputLine::styled(EXIT_HINT, Tone::Dim),
    ]
}

/// Break screen with a box-breathing guide
pub fn break_lines(countdown: &Countdown) -> Vec<OutputLine> {
    let elapsed = countdown.elapsed_secs();
    let bar = "█".repeat(2 + breath_level(elapsed) as usize * 4);
    vec![
        OutputLine::styled(countdown.label.as_str(), Tone::Heading),
        OutputLine::blank(),
        OutputLine::styled(countdown.clock(), Tone::System),
        OutputLine::blank(),
        OutputLine::styled(breath_phase(elapsed), Tone::Info),
        OutputLine::styled(bar, Tone::Info),
        OutputLine::blank(),
        OutputLine::styled(EXIT_HINT, Tone::Dim),
    ]
}

pub fn render_focus(frame: &mut Frame, app: &App, countdown: &Countdown, area: Rect) {
    render_centered(frame, app, &focus_lines(countdown), area);
}

pub fn render_break(frame: &mut Frame, app: &App, countdown: &Countdown, area: Rect) {
    render_centered(frame, app, &break_lines(countdown), area);
}

fn render_centered(frame: &mut Frame, app: &App, lines: &[OutputLine], area: Rect) {
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + (area.height - height) / 2;
    let inner = Rect::new(area.x, top, area.width, height);
    let text: Vec<Line> = lines.iter().map(|l| to_line(l, &app.theme)).collect();
    let paragraph = Paragraph::new(text)
        .style(app.theme.base())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
