use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory
pub const HOME_ENV: &str = "ZEN_HOME";

/// Resolve the data directory: explicit flag, then `$ZEN_HOME`, then
/// `$XDG_DATA_HOME/zen`, then `~/.local/share/zen`
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    resolve(explicit, |key| std::env::var(key).ok())
}

fn resolve(explicit: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);
    if let Some(dir) = non_empty(HOME_ENV) {
        return dir;
    }
    if let Some(dir) = non_empty("XDG_DATA_HOME") {
        return dir.join("zen");
    }
    let home = non_empty("HOME").unwrap_or_else(|| PathBuf::from("/"));
    home.join(".local").join("share").join("zen")
}
