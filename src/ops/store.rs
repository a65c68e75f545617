use chrono::{DateTime, Utc};

use crate::model::memo::Memo;
use crate::model::task::{MAX_TASK_LENGTH, Task, listing_order};
use crate::parse::{distinct_tags, parse_priority, split_segments, truncate_chars};

use super::undo::UndoBuffer;

/// Most tasks accepted by a single `add`
pub const MAX_TASKS_PER_ADD: usize = 20;

/// Default archive retention
pub const DEFAULT_ARCHIVE_LIMIT: usize = 100;

/// How much of an oversized segment is echoed back in the error
const ECHO_CHARS: usize = 30;

/// Error type for task store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),
    #[error("Task with ID {0} does not exist.")]
    NotFound(String),
}

/// Everything the store owns, in a plain shape for persistence and hydration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreData {
    pub tasks: Vec<Task>,
    pub archive: Vec<Task>,
    pub memos: Vec<Memo>,
    pub total_completed: u64,
}

/// What `list` found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Sorted tasks; `tag` is set for a filtered listing
    Tasks { tag: Option<String>, tasks: Vec<Task> },
    Tags(Vec<String>),
    /// Nothing to show; carries the informational message
    Empty(String),
}

/// What `remove` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// `rm all`: this many tasks dropped, none archived
    Cleared(usize),
    /// `rm done`: this many tasks archived
    Archived(usize),
    /// `rm done` with no completed tasks
    NothingDone,
    /// `rm <id>`
    Removed { id: u32, archived: bool },
}

/// The authoritative in-memory model: active tasks, archive, memos and the
/// completion counter. Every mutation goes through a method here, which
/// snapshots for undo (tasks only) and calls `mark_dirty()`.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    archive: Vec<Task>,
    pub(super) memos: Vec<Memo>,
    total_completed: u64,
    archive_limit: usize,
    undo: UndoBuffer,
    dirty: bool,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::from_data(StoreData::default(), DEFAULT_ARCHIVE_LIMIT)
    }

    pub fn from_data(data: StoreData, archive_limit: usize) -> Self {
        let mut store = TaskStore {
            tasks: Vec::new(),
            archive: Vec::new(),
            memos: Vec::new(),
            total_completed: 0,
            archive_limit: archive_limit.max(1),
            undo: UndoBuffer::new(),
            dirty: false,
        };
        store.load(data);
        store
    }

    /// Copy out everything that gets persisted
    pub fn to_data(&self) -> StoreData {
        StoreData {
            tasks: self.tasks.clone(),
            archive: self.archive.clone(),
            memos: self.memos.clone(),
            total_completed: self.total_completed,
        }
    }

    /// Wholesale replacement used by hydration. Does not mark the store
    /// dirty and drops any pending undo snapshot.
    pub fn replace_all(&mut self, data: StoreData) {
        self.load(data);
        self.undo = UndoBuffer::new();
    }

    fn load(&mut self, mut data: StoreData) {
        for task in data.tasks.iter_mut().chain(data.archive.iter_mut()) {
            task.sanitize();
        }
        self.tasks = data.tasks;
        self.archive = data.archive;
        self.memos = data.memos;
        self.total_completed = data.total_completed;
        self.reindex();
        self.trim_archive();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn archive(&self) -> &[Task] {
        &self.archive
    }

    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn total_completed(&self) -> u64 {
        self.total_completed
    }

    pub fn find(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// First unfinished task in list order
    pub fn first_open(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| !t.done)
    }

    /// Distinct `@tag` tokens across the active list
    pub fn tags(&self) -> Vec<String> {
        distinct_tags(self.tasks.iter().map(|t| t.text.as_str()))
    }

    pub fn has_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    // -----------------------------------------------------------------------
    // Dirty tracking
    // -----------------------------------------------------------------------

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return and reset the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // -----------------------------------------------------------------------
    // Task operations
    // -----------------------------------------------------------------------

    /// Add one or more `;`-separated tasks. Returns the added tasks.
    pub fn add(&mut self, raw: &str) -> Result<Vec<Task>, TaskError> {
        let segments = split_segments(raw);
        if segments.is_empty() {
            return Err(TaskError::Validation(
                "You didn't enter any task text.".into(),
            ));
        }
        if segments.len() > MAX_TASKS_PER_ADD {
            return Err(TaskError::Validation(format!(
                "Too many tasks at once. Maximum is {}.",
                MAX_TASKS_PER_ADD
            )));
        }
        if let Some(long) = segments
            .iter()
            .find(|s| s.chars().count() > MAX_TASK_LENGTH)
        {
            return Err(too_long(long));
        }

        self.undo.snapshot(&self.tasks);
        let mut added = Vec::with_capacity(segments.len());
        for segment in segments {
            let (text, priority) = parse_priority(&segment);
            let task = Task::new(self.tasks.len() as u32 + 1, text, priority);
            added.push(task.clone());
            self.tasks.push(task);
        }
        self.reindex();
        self.mark_dirty();
        Ok(added)
    }

    /// List tasks: all, `tags`, or filtered by an `@tag` substring
    pub fn list(&self, filter: &str) -> Listing {
        let filter = filter.trim();
        if self.tasks.is_empty() {
            return Listing::Empty("Void. No tasks available.".into());
        }

        if filter == "tags" {
            let tags = self.tags();
            if tags.is_empty() {
                return Listing::Empty("No tags found used in tasks.".into());
            }
            return Listing::Tags(tags);
        }

        if filter.starts_with('@') {
            let mut tasks: Vec<Task> = self
                .tasks
                .iter()
                .filter(|t| t.text.contains(filter))
                .cloned()
                .collect();
            if tasks.is_empty() {
                return Listing::Empty(format!("No tasks found with tag {}", filter));
            }
            tasks.sort_by(listing_order);
            return Listing::Tasks {
                tag: Some(filter.to_string()),
                tasks,
            };
        }

        let mut tasks = self.tasks.clone();
        tasks.sort_by(listing_order);
        Listing::Tasks { tag: None, tasks }
    }

    /// Mark a task done. Repeating on a done task re-stamps and re-counts.
    pub fn done(&mut self, arg: &str, now: DateTime<Utc>) -> Result<Task, TaskError> {
        let id = parse_id(arg)?;
        let index = self.index_of(id, arg)?;

        self.undo.snapshot(&self.tasks);
        let task = &mut self.tasks[index];
        task.complete(now);
        let task = task.clone();
        self.total_completed += 1;
        self.mark_dirty();
        Ok(task)
    }

    /// Replace a task's text (`<id> <text>`). Priority comes from the new
    /// text alone; no marker resets it to 0.
    pub fn edit(&mut self, arg: &str) -> Result<Task, TaskError> {
        let arg = arg.trim();
        let (id_token, rest) = match arg.split_once(char::is_whitespace) {
            Some((id, rest)) if !rest.trim().is_empty() => (id, rest.trim()),
            _ => {
                return Err(TaskError::Validation(
                    "Usage: edit <id> <new text>".into(),
                ));
            }
        };
        let id = parse_id(id_token)?;
        if rest.chars().count() > MAX_TASK_LENGTH {
            return Err(too_long(rest));
        }
        let index = self.index_of(id, id_token)?;

        let (text, priority) = parse_priority(rest);
        self.undo.snapshot(&self.tasks);
        let task = &mut self.tasks[index];
        task.text = text;
        task.priority = priority;
        let task = task.clone();
        self.mark_dirty();
        Ok(task)
    }

    /// `all`, `done`, or a single id
    pub fn remove(&mut self, arg: &str, now: DateTime<Utc>) -> Result<Removal, TaskError> {
        match arg.trim() {
            "all" => {
                self.undo.snapshot(&self.tasks);
                let count = self.tasks.len();
                self.tasks.clear();
                self.mark_dirty();
                Ok(Removal::Cleared(count))
            }
            "done" => {
                if !self.tasks.iter().any(|t| t.done) {
                    return Ok(Removal::NothingDone);
                }
                self.undo.snapshot(&self.tasks);
                let (done, open): (Vec<Task>, Vec<Task>) =
                    std::mem::take(&mut self.tasks).into_iter().partition(|t| t.done);
                let count = done.len();
                for task in done {
                    self.push_archive(task, now);
                }
                self.tasks = open;
                self.reindex();
                self.mark_dirty();
                Ok(Removal::Archived(count))
            }
            other => {
                let id = parse_id(other)?;
                let index = self.index_of(id, other)?;
                self.undo.snapshot(&self.tasks);
                let task = self.tasks.remove(index);
                let archived = task.done;
                if archived {
                    self.push_archive(task, now);
                }
                self.reindex();
                self.mark_dirty();
                Ok(Removal::Removed { id, archived })
            }
        }
    }

    /// Revert the task list to the last snapshot. Returns false when there
    /// is nothing to revert. Archive, memos and the counter are untouched.
    pub fn undo(&mut self) -> bool {
        match self.undo.restore() {
            Some(tasks) => {
                self.tasks = tasks;
                self.reindex();
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Replace the active list with imported tasks. A zero counter in the
    /// payload leaves the local counter alone.
    pub fn import(&mut self, mut tasks: Vec<Task>, total_completed: u64) -> usize {
        for task in &mut tasks {
            task.sanitize();
        }
        self.undo.snapshot(&self.tasks);
        self.tasks = tasks;
        if total_completed > 0 {
            self.total_completed = total_completed;
        }
        self.reindex();
        self.mark_dirty();
        self.tasks.len()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn index_of(&self, id: u32, raw: &str) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(raw.trim().to_string()))
    }

    fn push_archive(&mut self, mut task: Task, now: DateTime<Utc>) {
        if task.completed_at.is_none() {
            task.completed_at = Some(now);
        }
        self.archive.push(task);
        self.trim_archive();
    }

    fn trim_archive(&mut self) {
        if self.archive.len() > self.archive_limit {
            let excess = self.archive.len() - self.archive_limit;
            self.archive.drain(..excess);
        }
    }

    /// Renumber the active list `1..=N` in array order
    fn reindex(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.id = i as u32 + 1;
        }
    }
}

/// Parse a task id argument
pub fn parse_id(arg: &str) -> Result<u32, TaskError> {
    let arg = arg.trim();
    arg.parse::<u32>()
        .map_err(|_| TaskError::Validation(format!("\"{}\" is not a valid task ID.", arg)))
}

fn too_long(segment: &str) -> TaskError {
    TaskError::Validation(format!(
        "Task text too long (max {} chars). Shorten: \"{}...\"",
        MAX_TASK_LENGTH,
        truncate_chars(segment, ECHO_CHARS)
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
