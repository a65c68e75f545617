use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::identity::LocalIdentityProvider;
use crate::io::{MemoryKvStore, SyncService};
use crate::model::config::ZenConfig;
use crate::runtime::Runtime;
use crate::tui::alerts::{Alerts, TerminalAlerts};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A runtime over an in-memory store with no remote
pub fn test_runtime() -> Runtime {
    let sync = SyncService::new(None, Box::new(LocalIdentityProvider));
    Runtime::with_parts(ZenConfig::default(), Box::new(MemoryKvStore::new()), sync).unwrap()
}

pub fn app_with_alerts(alerts: Box<dyn Alerts>) -> App {
    App::new(test_runtime(), alerts)
}

/// An App whose bell goes nowhere
pub fn test_app() -> App {
    app_with_alerts(Box::new(TerminalAlerts::new(std::io::sink())))
}

/// An App with a few tasks and the banner cleared
pub fn app_with_tasks(lines: &[&str]) -> App {
    let mut app = test_app();
    for line in lines {
        app.editor.set(line);
        app.submit();
    }
    app.scrollback.clear();
    app
}
