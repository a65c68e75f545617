use unicode_segmentation::UnicodeSegmentation;

use crate::cli::output::{OutputLine, Tone};
use crate::util::unicode;

/// A grapheme with its tone and display width.
struct Cell<'a> {
    s: &'a str,
    tone: Tone,
    display_width: usize,
}

fn cells(line: &OutputLine) -> Vec<Cell<'_>> {
    line.spans
        .iter()
        .flat_map(|span| {
            span.text.graphemes(true).map(move |g| Cell {
                s: g,
                tone: span.tone,
                display_width: unicode::display_width(g),
            })
        })
        .collect()
}

/// Wrap one styled line into screen rows of at most `width` cells.
///
/// Breaks after whitespace when possible, falling back to a character wrap
/// for long tokens. If the content before the last space would fill less
/// than half the row, the row is char-wrapped instead.
pub fn wrap_output_line(line: &OutputLine, width: usize) -> Vec<OutputLine> {
    wrap(line, width, true)
}

/// Wrap at exactly `width` cells, ignoring word boundaries. Used for the
/// input line so the cursor position maps directly to a row and column.
pub fn hard_wrap(line: &OutputLine, width: usize) -> Vec<OutputLine> {
    wrap(line, width, false)
}

fn wrap(line: &OutputLine, width: usize, word_breaks: bool) -> Vec<OutputLine> {
    let cells = cells(line);
    let total: usize = cells.iter().map(|c| c.display_width).sum();
    if width == 0 || total <= width {
        return vec![line.clone()];
    }

    let mut rows = Vec::new();
    let mut start = 0;
    while start < cells.len() {
        let mut used = 0;
        let mut end = start;
        let mut last_break = None;
        while end < cells.len() && used + cells[end].display_width <= width {
            used += cells[end].display_width;
            if cells[end].s.chars().all(char::is_whitespace) {
                last_break = Some((end + 1, used));
            }
            end += 1;
        }
        if word_breaks && end < cells.len() {
            if let Some((at, before)) = last_break {
                if before * 2 >= width {
                    end = at;
                }
            }
        }
        // A single cell wider than the row still takes a row of its own
        if end == start {
            end = start + 1;
        }
        rows.push(collect_row(&cells[start..end]));
        start = end;
    }
    rows
}

/// Wrap every line, returning all screen rows in order.
pub fn wrap_output(lines: &[OutputLine], width: usize) -> Vec<OutputLine> {
    lines
        .iter()
        .flat_map(|line| wrap_output_line(line, width))
        .collect()
}

fn collect_row(cells: &[Cell<'_>]) -> OutputLine {
    let mut row = OutputLine::new();
    let mut run = String::new();
    let mut tone = None;
    for cell in cells {
        if tone.is_some_and(|t| t != cell.tone) {
            row = row.push(std::mem::take(&mut run), tone.unwrap_or(Tone::Normal));
        }
        tone = Some(cell.tone);
        run.push_str(cell.s);
    }
    if let Some(tone) = tone {
        row = row.push(run, tone);
    }
    row
}
