use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest task text accepted by `add` and `edit`, in characters
pub const MAX_TASK_LENGTH: usize = 200;

/// Highest priority a marker can encode (`!!!`)
pub const MAX_PRIORITY: u8 = 3;

/// A single to-do item.
///
/// `id` is a display position, not an identity: the store renumbers every
/// task `1..=N` after each structural change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub done: bool,
    /// Completion time, serialized as epoch milliseconds
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: u32, text: String, priority: u8) -> Self {
        Task {
            id,
            text,
            priority: priority.min(MAX_PRIORITY),
            done: false,
            completed_at: None,
        }
    }

    /// Mark done and stamp the completion time (re-stamps if already done)
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.done = true;
        self.completed_at = Some(now);
    }

    /// Pull a decoded task back inside the limits `add` enforces: priority
    /// at most `MAX_PRIORITY`, text at most `MAX_TASK_LENGTH` characters.
    pub fn sanitize(&mut self) {
        self.priority = self.priority.min(MAX_PRIORITY);
        if let Some((idx, _)) = self.text.char_indices().nth(MAX_TASK_LENGTH) {
            self.text.truncate(idx);
        }
    }

    /// `[P2]`-style annotation, empty for priority 0
    pub fn priority_label(&self) -> String {
        if self.priority > 0 {
            format!("[P{}]", self.priority)
        } else {
            String::new()
        }
    }
}

/// Listing order: open before done, then higher priority, then lower id.
pub fn listing_order(a: &Task, b: &Task) -> std::cmp::Ordering {
    a.done
        .cmp(&b.done)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.id.cmp(&b.id))
}
