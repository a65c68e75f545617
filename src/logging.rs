use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directives, e.g. `ZEN_LOG=zen=debug`
pub const LOG_ENV: &str = "ZEN_LOG";
/// Log file of interactive sessions, inside the data directory
pub const LOG_FILE: &str = "zen.log";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr. Used by `zen run`, where stdout carries the result.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(filter("zen=warn"))
        .with(fmt::layer().compact().with_writer(io::stderr))
        .try_init();
}

/// Append to `zen.log` in the data directory. The interactive session owns
/// the terminal, so nothing may be written to stderr while it runs.
pub fn init_file(data_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;
    let _ = tracing_subscriber::registry()
        .with(filter("zen=info"))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init();
    Ok(())
}
