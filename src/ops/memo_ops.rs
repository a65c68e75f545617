use chrono::{DateTime, Utc};

use crate::model::memo::Memo;

use super::store::{TaskError, TaskStore};

impl TaskStore {
    /// Add a memo. Two memos in the same millisecond get distinct ids.
    pub fn add_memo(&mut self, text: &str, now: DateTime<Utc>) -> Result<Memo, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::Validation("Memo text is empty.".into()));
        }
        let mut id = now.timestamp_millis();
        if let Some(max) = self.memos.iter().map(|m| m.id).max() {
            id = id.max(max + 1);
        }
        let memo = Memo::new(id, text.to_string(), now);
        self.memos.push(memo.clone());
        self.mark_dirty();
        Ok(memo)
    }

    /// Memos newest first
    pub fn memos_newest_first(&self) -> Vec<Memo> {
        let mut memos = self.memos.clone();
        memos.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        memos
    }

    /// Drop every memo. Returns how many were removed.
    pub fn clear_memos(&mut self) -> usize {
        let count = self.memos.len();
        self.memos.clear();
        if count > 0 {
            self.mark_dirty();
        }
        count
    }
}
