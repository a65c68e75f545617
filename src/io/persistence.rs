use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::model::config::{ZenConfig, is_known_theme};
use crate::model::memo::Memo;
use crate::model::session::{CommandHistory, Identity, Session};
use crate::model::task::Task;
use crate::ops::store::{StoreData, TaskStore};

use super::kv_store::{KvStore, StorageError};
use super::remote::RemoteDocument;

/// Keys written to the durable store, one per persisted field
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const ARCHIVE: &str = "archive";
    pub const MEMOS: &str = "memos";
    pub const TOTAL_COMPLETED: &str = "total_completed";
    pub const THEME: &str = "theme";
    pub const SOUND: &str = "sound";
    pub const NOTIFY: &str = "notify";
    pub const HISTORY: &str = "history";
    pub const IDENTITY: &str = "identity";
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Trailing-edge debounce: every `schedule` pushes the deadline out again
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

// ---------------------------------------------------------------------------
// Bridge
// ---------------------------------------------------------------------------

/// Moves state between the in-memory model and the durable store: debounced
/// write-out, load at startup, and wholesale hydration from a remote document.
pub struct PersistenceBridge {
    kv: Box<dyn KvStore>,
    debounce: Debouncer,
    hydrating: bool,
}

impl PersistenceBridge {
    pub fn new(kv: Box<dyn KvStore>, delay: Duration) -> Self {
        PersistenceBridge {
            kv,
            debounce: Debouncer::new(delay),
            hydrating: false,
        }
    }

    pub fn kv(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }

    /// Deadline of the pending flush, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.deadline().is_some()
    }

    /// Build the store and session from whatever was persisted. Missing keys
    /// fall back to config defaults.
    pub fn load(&self, config: &ZenConfig) -> Result<(TaskStore, Session), StorageError> {
        let data = StoreData {
            tasks: self.read::<Vec<Task>>(keys::TASKS)?.unwrap_or_default(),
            archive: self.read::<Vec<Task>>(keys::ARCHIVE)?.unwrap_or_default(),
            memos: self.read::<Vec<Memo>>(keys::MEMOS)?.unwrap_or_default(),
            total_completed: self.read::<u64>(keys::TOTAL_COMPLETED)?.unwrap_or(0),
        };
        let store = TaskStore::from_data(data, config.persistence.archive_limit);

        let theme = self
            .read::<String>(keys::THEME)?
            .filter(|t| is_known_theme(t))
            .unwrap_or_else(|| config.ui.theme.clone());
        let mut session = Session::new(theme, config.persistence.history_limit);
        session.sound_enabled = self.read::<bool>(keys::SOUND)?.unwrap_or(false);
        session.notifications_enabled = self.read::<bool>(keys::NOTIFY)?.unwrap_or(false);
        if let Some(entries) = self.read::<Vec<String>>(keys::HISTORY)? {
            session.history =
                CommandHistory::from_entries(entries, config.persistence.history_limit);
        }
        session.identity = self.read::<Identity>(keys::IDENTITY)?;

        debug!(
            tasks = store.tasks().len(),
            archive = store.archive().len(),
            "loaded local state"
        );
        Ok((store, session))
    }

    /// Collect dirty flags after a command. Schedules a flush unless a
    /// hydration is in progress. Returns whether a flush was scheduled.
    pub fn note_mutation(
        &mut self,
        store: &mut TaskStore,
        session: &mut Session,
        now: Instant,
    ) -> bool {
        // Both flags must be drained, so no short-circuit
        let dirty = store.take_dirty() | session.take_dirty();
        if !dirty || self.hydrating {
            return false;
        }
        self.debounce.schedule(now);
        true
    }

    /// Flush when the debounce deadline has passed
    pub fn flush_if_due(
        &mut self,
        store: &TaskStore,
        session: &Session,
        now: Instant,
    ) -> Result<bool, StorageError> {
        if !self.debounce.is_due(now) {
            return Ok(false);
        }
        self.flush(store, session)?;
        Ok(true)
    }

    /// Write every persisted field now, under independent keys. A failed
    /// write leaves a flush scheduled so the next tick retries it.
    pub fn flush(&mut self, store: &TaskStore, session: &Session) -> Result<(), StorageError> {
        self.debounce.cancel();
        self.write_all(store, session)
            .inspect_err(|_| self.debounce.schedule(Instant::now()))
    }

    fn write_all(&mut self, store: &TaskStore, session: &Session) -> Result<(), StorageError> {
        self.write(keys::TASKS, &store.tasks())?;
        self.write(keys::ARCHIVE, &store.archive())?;
        self.write(keys::MEMOS, &store.memos())?;
        self.write(keys::TOTAL_COMPLETED, &store.total_completed())?;
        self.write(keys::THEME, &session.theme)?;
        self.write(keys::SOUND, &session.sound_enabled)?;
        self.write(keys::NOTIFY, &session.notifications_enabled)?;
        self.write(keys::HISTORY, &session.history.entries())?;
        match &session.identity {
            Some(identity) => self.write(keys::IDENTITY, identity)?,
            None => self.kv.remove(keys::IDENTITY)?,
        }
        info!(tasks = store.tasks().len(), "flushed local state");
        Ok(())
    }

    /// Replace local state with a remote document without echoing a write
    pub fn hydrate(&mut self, store: &mut TaskStore, session: &mut Session, doc: RemoteDocument) {
        self.hydrating = true;

        let tasks = doc.tasks.len();
        store.replace_all(StoreData {
            tasks: doc.tasks,
            archive: doc.archive,
            memos: doc.memos,
            total_completed: doc.total_completed,
        });
        if let Some(theme) = doc.theme.filter(|t| is_known_theme(t)) {
            session.set_theme(&theme);
        }
        if let Some(history) = doc.command_history {
            session.history.replace(history);
        }
        self.note_mutation(store, session, Instant::now());

        self.hydrating = false;
        info!(tasks, "hydrated from remote document");
    }

    /// Snapshot local state as a remote document
    pub fn capture(store: &TaskStore, session: &Session) -> RemoteDocument {
        RemoteDocument {
            tasks: store.tasks().to_vec(),
            archive: store.archive().to_vec(),
            memos: store.memos().to_vec(),
            total_completed: store.total_completed(),
            theme: Some(session.theme.clone()),
            command_history: Some(session.history.entries()),
            last_updated: Some(chrono::Utc::now()),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StorageError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.kv.set(key, &text)
    }
}
