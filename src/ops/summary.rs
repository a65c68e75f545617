use chrono::{DateTime, Duration, Utc};

use crate::model::session::Session;
use crate::model::task::Task;

use super::store::TaskStore;

/// Window covered by `review`
pub const REVIEW_WINDOW_HOURS: i64 = 24;

/// Counts shown by `stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total_completed: u64,
    pub in_list: usize,
}

impl TaskStore {
    pub fn stats(&self) -> Stats {
        Stats {
            total_completed: self.total_completed(),
            in_list: self.tasks().len(),
        }
    }

    /// Tasks completed within the review window, from both the active list
    /// and the archive, oldest first
    pub fn review(&self, now: DateTime<Utc>) -> Vec<Task> {
        let since = now - Duration::hours(REVIEW_WINDOW_HOURS);
        let mut recent: Vec<Task> = self
            .tasks()
            .iter()
            .chain(self.archive().iter())
            .filter(|t| t.done && t.completed_at.is_some_and(|at| at > since && at <= now))
            .cloned()
            .collect();
        recent.sort_by_key(|t| t.completed_at);
        recent
    }
}

/// Label/value rows for `zenfetch`
pub fn zenfetch_rows(store: &TaskStore, session: &Session) -> Vec<(String, String)> {
    let open = store.tasks().iter().filter(|t| !t.done).count();
    let done = store.tasks().len() - open;
    let user = match &session.identity {
        Some(identity) => identity.email.clone(),
        None => "guest".to_string(),
    };
    let on_off = |flag: bool| if flag { "on" } else { "off" }.to_string();

    vec![
        ("User".into(), user),
        ("Theme".into(), session.theme.clone()),
        ("Sound".into(), on_off(session.sound_enabled)),
        ("Notify".into(), on_off(session.notifications_enabled)),
        ("Tasks".into(), format!("{} open, {} done", open, done)),
        ("Archived".into(), store.archive().len().to_string()),
        ("Memos".into(), store.memos().len().to_string()),
        ("Completed".into(), store.total_completed().to_string()),
        ("Tags".into(), store.tags().len().to_string()),
        ("History".into(), session.history.len().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::store::{DEFAULT_ARCHIVE_LIMIT, StoreData};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 14, 18, 0, 0).unwrap()
    }

    fn completed(text: &str, hours_ago: i64) -> Task {
        let mut task = Task::new(1, text.into(), 0);
        task.complete(now() - Duration::hours(hours_ago));
        task
    }

    #[test]
    fn review_spans_list_and_archive_oldest_first() {
        let store = TaskStore::from_data(
            StoreData {
                tasks: vec![completed("recent", 1), Task::new(2, "open".into(), 0)],
                archive: vec![completed("morning", 8), completed("last week", 24 * 7)],
                ..Default::default()
            },
            DEFAULT_ARCHIVE_LIMIT,
        );
        let texts: Vec<String> = store.review(now()).into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["morning", "recent"]);
    }

    #[test]
    fn review_empty_when_nothing_recent() {
        let store = TaskStore::new();
        assert!(store.review(now()).is_empty());
    }

    #[test]
    fn stats_counts() {
        let mut store = TaskStore::new();
        store.add("a; b").unwrap();
        store.done("1", now()).unwrap();
        assert_eq!(
            store.stats(),
            Stats {
                total_completed: 1,
                in_list: 2
            }
        );
    }

    #[test]
    fn zenfetch_reports_guest_and_counts() {
        let mut store = TaskStore::new();
        store.add("a @x; b @y").unwrap();
        store.done("2", now()).unwrap();
        let session = Session::new("amber".into(), 50);
        let rows = zenfetch_rows(&store, &session);
        let get = |label: &str| {
            rows.iter()
                .find(|(l, _)| l == label)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("User"), "guest");
        assert_eq!(get("Theme"), "amber");
        assert_eq!(get("Tasks"), "1 open, 1 done");
        assert_eq!(get("Tags"), "2");
    }
}
