use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::engine::error::CommandError;
use crate::engine::result::{CommandResult, Level};
use crate::model::memo::Memo;
use crate::model::task::Task;
use crate::parse::split_tags;
use crate::util::unicode::{display_width, pad_to_width};

/// Semantic color of a span; the host maps tones to theme colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Normal,
    System,
    Info,
    Error,
    Dim,
    Heading,
    Tag,
    Done,
    Priority,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpan {
    pub text: String,
    pub tone: Tone,
}

/// One line of terminal output made of styled spans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputLine {
    pub spans: Vec<OutputSpan>,
}

impl OutputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn styled(text: impl Into<String>, tone: Tone) -> Self {
        OutputLine::new().push(text, tone)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Tone::Normal)
    }

    pub fn push(mut self, text: impl Into<String>, tone: Tone) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(OutputSpan { text, tone });
        }
        self
    }

    /// The line with styling stripped
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Prefixed messages
// ---------------------------------------------------------------------------

pub fn system_line(text: &str) -> OutputLine {
    OutputLine::styled("[SYSTEM] ", Tone::System).push(text, Tone::Normal)
}

pub fn info_line(text: &str) -> OutputLine {
    OutputLine::styled("[INFO] ", Tone::Info).push(text, Tone::Normal)
}

pub fn error_line(text: &str) -> OutputLine {
    OutputLine::styled("[ERROR] ", Tone::Error).push(text, Tone::Error)
}

/// The submitted command as echoed into the scrollback
pub fn echo_line(prompt: &str, input: &str) -> OutputLine {
    OutputLine::styled(prompt, Tone::Prompt).push(input, Tone::Normal)
}

fn heading(title: &str) -> OutputLine {
    OutputLine::styled(format!("=== {} ===", title), Tone::Heading)
}

/// Startup banner
pub fn banner() -> Vec<OutputLine> {
    vec![
        OutputLine::styled("  z e n   t e r m i n a l", Tone::Heading),
        OutputLine::styled(format!("  v{}", env!("CARGO_PKG_VERSION")), Tone::Dim),
        OutputLine::blank(),
        OutputLine::plain("Type \"help\" for a list of commands."),
    ]
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Render a result with timestamps in local time
pub fn render_result(result: &CommandResult) -> Vec<OutputLine> {
    render_result_in(result, &Local)
}

/// Render a result with timestamps in `tz`
pub fn render_result_in<Tz: TimeZone>(result: &CommandResult, tz: &Tz) -> Vec<OutputLine>
where
    Tz::Offset: std::fmt::Display,
{
    match result {
        CommandResult::Message {
            level: Level::Success,
            text,
        } => vec![system_line(text)],
        CommandResult::Message {
            level: Level::Info,
            text,
        } => vec![info_line(text)],
        CommandResult::Tags { tags } => {
            let mut line = OutputLine::styled("TAGS: ", Tone::Heading);
            for (i, tag) in tags.iter().enumerate() {
                if i > 0 {
                    line = line.push("  ", Tone::Normal);
                }
                line = line.push(tag.as_str(), Tone::Tag);
            }
            vec![line]
        }
        CommandResult::Tasks { title, tasks } => {
            let mut lines = Vec::with_capacity(tasks.len() + 1);
            if let Some(title) = title {
                lines.push(heading(title));
            }
            let id_width = tasks
                .iter()
                .map(|t| t.id.to_string().len())
                .max()
                .unwrap_or(1);
            lines.extend(tasks.iter().map(|t| task_line(t, id_width)));
            lines
        }
        CommandResult::Memos { memos } => {
            let mut lines = vec![heading("MEMOS")];
            lines.extend(memos.iter().map(|m| memo_line(m, tz)));
            lines
        }
        CommandResult::Summary { title, rows } => {
            let width = rows.iter().map(|(l, _)| display_width(l)).max().unwrap_or(0) + 1;
            let mut lines = vec![heading(title)];
            lines.extend(rows.iter().map(|(label, value)| {
                OutputLine::styled(pad_to_width(&format!("{}:", label), width + 1), Tone::Dim)
                    .push(value.as_str(), Tone::Normal)
            }));
            lines
        }
        CommandResult::Review { tasks } => {
            let mut lines = vec![heading("24-HOUR RETROSPECTIVE")];
            for task in tasks {
                let time = task
                    .completed_at
                    .map(|at| at.with_timezone(tz).format("%H:%M").to_string())
                    .unwrap_or_else(|| "--:--".into());
                lines.push(
                    OutputLine::styled(format!("[{}] ", time), Tone::Dim)
                        .push("✅ ", Tone::Done)
                        .push(task.text.as_str(), Tone::Normal),
                );
            }
            lines.push(OutputLine::blank());
            lines.push(system_line(&format!(
                "Total: {} achievements detected.",
                tasks.len()
            )));
            lines
        }
        CommandResult::Text { title, lines } => {
            let mut out = Vec::with_capacity(lines.len() + 1);
            if let Some(title) = title {
                out.push(heading(title));
            }
            out.extend(lines.iter().map(|l| OutputLine::plain(l.as_str())));
            out
        }
    }
}

/// `3. [x] text @tag [P2]`
pub fn task_line(task: &Task, id_width: usize) -> OutputLine {
    let id = format!("{:>width$}. ", task.id, width = id_width);
    let (mark, text_tone) = if task.done {
        ("[x] ", Tone::Done)
    } else {
        ("[ ] ", Tone::Normal)
    };
    let mut line = OutputLine::styled(id, Tone::Dim).push(mark, text_tone);
    for (run, is_tag) in split_tags(&task.text) {
        let tone = if is_tag && !task.done { Tone::Tag } else { text_tone };
        line = line.push(run, tone);
    }
    let label = task.priority_label();
    if !label.is_empty() {
        line = line.push(" ", text_tone).push(label, Tone::Priority);
    }
    line
}

fn memo_line<Tz: TimeZone>(memo: &Memo, tz: &Tz) -> OutputLine
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = memo.timestamp.with_timezone(tz).format("%Y-%m-%d %H:%M");
    OutputLine::styled(format!("[{}] ", stamp), Tone::Dim).push(memo.text.as_str(), Tone::Normal)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

pub fn render_error(err: &CommandError) -> Vec<OutputLine> {
    let mut lines = vec![error_line(&err.to_string())];
    if let CommandError::Decode(cause) = err {
        lines.push(OutputLine::styled(format!("  ({})", cause), Tone::Dim));
    }
    lines
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ErrorJson<'a> {
    pub error: &'a str,
    pub message: String,
}

impl<'a> From<&'a CommandError> for ErrorJson<'a> {
    fn from(err: &'a CommandError) -> Self {
        ErrorJson {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}
