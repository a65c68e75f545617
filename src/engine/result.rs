use serde::Serialize;

use crate::model::memo::Memo;
use crate::model::task::Task;

/// Severity of a plain message result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Info,
}

/// Structured outcome of a command, rendered by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandResult {
    Message {
        level: Level,
        text: String,
    },
    Tags {
        tags: Vec<String>,
    },
    Tasks {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        tasks: Vec<Task>,
    },
    Memos {
        memos: Vec<Memo>,
    },
    /// Aligned label/value rows under a heading
    Summary {
        title: String,
        rows: Vec<(String, String)>,
    },
    Review {
        tasks: Vec<Task>,
    },
    /// Free-form lines, optionally under a heading
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        lines: Vec<String>,
    },
}

impl CommandResult {
    pub fn success(text: impl Into<String>) -> Self {
        CommandResult::Message {
            level: Level::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        CommandResult::Message {
            level: Level::Info,
            text: text.into(),
        }
    }
}

/// Something only the host can do: touch the screen, the clock or the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Clear,
    ThemePicker,
    Focus { minutes: u32, label: String },
    Break { minutes: u32 },
    Login { email: String },
    Logout,
    Sync,
    Quit,
}

impl Effect {
    /// Effects that need the full-screen session
    pub fn needs_screen(&self) -> bool {
        matches!(
            self,
            Effect::Clear | Effect::ThemePicker | Effect::Focus { .. } | Effect::Break { .. }
        )
    }
}

/// What a handler hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Result(CommandResult),
    Effect(Effect),
}

impl From<CommandResult> for Reply {
    fn from(result: CommandResult) -> Self {
        Reply::Result(result)
    }
}

impl From<Effect> for Reply {
    fn from(effect: Effect) -> Self {
        Reply::Effect(effect)
    }
}
