use std::io::Write;

use tracing::warn;

use crate::cli::output::{OutputLine, Tone};

/// Audio and notification sink. Never required for a command's result.
pub trait Alerts {
    /// Short success sound
    fn chime(&mut self);
    /// Post a notification. Returns a line for the scrollback when the
    /// sink has no channel of its own.
    fn notify(&mut self, title: &str, body: &str) -> Option<OutputLine>;
}

/// Rings the terminal bell and shows notifications inline
pub struct TerminalAlerts<W: Write> {
    out: W,
}

impl<W: Write> TerminalAlerts<W> {
    pub fn new(out: W) -> Self {
        TerminalAlerts { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Alerts for TerminalAlerts<W> {
    fn chime(&mut self) {
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            warn!(error = %e, "could not ring the bell");
        }
    }

    fn notify(&mut self, title: &str, body: &str) -> Option<OutputLine> {
        Some(notify_line(title, body))
    }
}

pub fn notify_line(title: &str, body: &str) -> OutputLine {
    OutputLine::styled("[NOTIFY] ", Tone::Info)
        .push(title, Tone::Heading)
        .push(" ", Tone::Normal)
        .push(body, Tone::Normal)
}

/// Focus-complete notification text
pub fn focus_complete(label: &str) -> (&'static str, String) {
    ("Focus Complete!", format!("Great work on: {}", label))
}

pub fn break_complete() -> (&'static str, String) {
    ("Break Over", "Ready to get back to work?".to_string())
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Records every alert for assertions
    #[derive(Clone, Default)]
    pub struct RecordingAlerts {
        pub log: Rc<RefCell<Vec<String>>>,
    }

    impl Alerts for RecordingAlerts {
        fn chime(&mut self) {
            self.log.borrow_mut().push("chime".into());
        }

        fn notify(&mut self, title: &str, body: &str) -> Option<OutputLine> {
            self.log.borrow_mut().push(format!("notify: {} {}", title, body));
            None
        }
    }
}
