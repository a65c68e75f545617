use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZenConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub timers: TimerConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme used when none has been persisted yet
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Prompt shown when signed out
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            theme: default_theme(),
            prompt: default_prompt(),
        }
    }
}

/// Built-in theme names, in picker order
pub const THEME_NAMES: &[&str] = &["green", "amber", "cyan"];

pub fn is_known_theme(name: &str) -> bool {
    THEME_NAMES.contains(&name)
}

fn default_theme() -> String {
    THEME_NAMES[0].into()
}

fn default_prompt() -> String {
    "> ".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

fn default_focus_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Quiet period before a burst of mutations is written out
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_archive_limit")]
    pub archive_limit: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig {
            debounce_ms: default_debounce_ms(),
            history_limit: default_history_limit(),
            archive_limit: default_archive_limit(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_history_limit() -> usize {
    50
}

fn default_archive_limit() -> usize {
    100
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory holding one remote document per identity.
    /// Sync is unavailable when unset.
    #[serde(default)]
    pub remote_dir: Option<PathBuf>,
    /// Default email for `login` without an argument
    #[serde(default)]
    pub email: Option<String>,
}
