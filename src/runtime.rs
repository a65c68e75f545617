use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::engine::{CommandEngine, CommandError, CommandResult, Context, Effect, Reply};
use crate::io::config_io::{self, ConfigError};
use crate::io::{FileKvStore, KvStore, PersistenceBridge, StorageError, SyncService};
use crate::model::config::ZenConfig;
use crate::model::session::Session;
use crate::ops::store::TaskStore;

/// Error opening the data directory
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What running a line produced for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executed {
    /// Blank input
    Nothing,
    Results(Vec<CommandResult>),
    /// Screen effects and `exit`, for the host to carry out
    Effect(Effect),
}

/// The store, session and collaborators of one process, wired together.
/// Both the interactive terminal and `zen run` drive this.
pub struct Runtime {
    pub config: ZenConfig,
    pub engine: CommandEngine,
    pub store: TaskStore,
    pub session: Session,
    bridge: PersistenceBridge,
    sync: SyncService,
}

impl Runtime {
    /// Read config.toml and the persisted state in `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self, RuntimeError> {
        let config = config_io::read_config(data_dir)?;
        let kv = FileKvStore::open(data_dir)?;
        let sync = SyncService::from_config(&config.sync);
        Ok(Runtime::with_parts(config, Box::new(kv), sync)?)
    }

    pub fn with_parts(
        config: ZenConfig,
        kv: Box<dyn KvStore>,
        sync: SyncService,
    ) -> Result<Self, StorageError> {
        let bridge =
            PersistenceBridge::new(kv, Duration::from_millis(config.persistence.debounce_ms));
        let (store, session) = bridge.load(&config)?;
        Ok(Runtime {
            config,
            engine: CommandEngine::new(),
            store,
            session,
            bridge,
            sync,
        })
    }

    /// Hydrate from the remote document of a remembered identity
    pub fn hydrate_on_start(&mut self) -> Vec<CommandResult> {
        self.sync
            .hydrate_on_start(&mut self.bridge, &mut self.store, &mut self.session)
    }

    /// Record and run one submitted line. Sign-in, sign-out and sync are
    /// carried out here; everything else the host must do is handed back.
    pub fn execute(&mut self, line: &str, now: DateTime<Utc>) -> Result<Executed, CommandError> {
        self.session.record_command(line);
        let outcome = self.dispatch(line, now);
        self.note_changes(Instant::now());
        outcome
    }

    fn dispatch(&mut self, line: &str, now: DateTime<Utc>) -> Result<Executed, CommandError> {
        let mut ctx = Context {
            store: &mut self.store,
            session: &mut self.session,
            config: &self.config,
            now,
        };
        let reply = match self.engine.dispatch(line, &mut ctx)? {
            None => return Ok(Executed::Nothing),
            Some(reply) => reply,
        };
        match reply {
            Reply::Result(result) => Ok(Executed::Results(vec![result])),
            Reply::Effect(Effect::Login { email }) => self
                .sync
                .login(&email, &mut self.bridge, &mut self.store, &mut self.session)
                .map(Executed::Results),
            Reply::Effect(Effect::Logout) => {
                Ok(Executed::Results(vec![self.sync.logout(&mut self.session)]))
            }
            Reply::Effect(Effect::Sync) => self
                .sync
                .sync(&self.store, &self.session)
                .map(|r| Executed::Results(vec![r])),
            Reply::Effect(effect) => Ok(Executed::Effect(effect)),
        }
    }

    /// Whether the verb of `line` rings the chime on success
    pub fn chimes(&self, line: &str) -> bool {
        self.engine.resolve(line).is_some_and(|spec| spec.chime)
    }

    /// Schedule a write if the store or session changed
    pub fn note_changes(&mut self, now: Instant) {
        self.bridge
            .note_mutation(&mut self.store, &mut self.session, now);
    }

    /// Flush when the debounce deadline has passed
    pub fn flush_if_due(&mut self, now: Instant) -> Result<bool, StorageError> {
        self.bridge.flush_if_due(&self.store, &self.session, now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.bridge.next_deadline()
    }

    /// Final write on teardown
    pub fn shutdown(&mut self) -> Result<(), StorageError> {
        self.note_changes(Instant::now());
        self.bridge.flush(&self.store, &self.session).inspect_err(|e| {
            warn!(error = %e, "final flush failed");
        })
    }
}
