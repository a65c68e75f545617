use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::memo::Memo;
use crate::model::task::Task;

use super::kv_store::atomic_write;

/// Error type for the remote document store and sign-in
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Cloud sync is not configured. Set [sync] remote_dir in config.toml.")]
    NotConfigured,
    #[error("Cloud sync failed. could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Cloud sync failed. could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Cloud sync failed. remote document is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("Login failed. {0}")]
    SignIn(String),
}

/// The single per-user document kept by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub archive: Vec<Task>,
    #[serde(default)]
    pub memos: Vec<Memo>,
    #[serde(default)]
    pub total_completed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_history: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Whole-document store keyed by an opaque uid
pub trait RemoteStore {
    /// `Ok(None)` when no document exists for `uid` yet
    fn fetch(&self, uid: &str) -> Result<Option<RemoteDocument>, RemoteError>;
    fn store(&mut self, uid: &str, doc: &RemoteDocument) -> Result<(), RemoteError>;
}

/// `<uid>.json` files in a directory, typically one synced by another tool
#[derive(Debug, Clone)]
pub struct DirRemoteStore {
    dir: PathBuf,
}

impl DirRemoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirRemoteStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, uid: &str) -> PathBuf {
        self.dir.join(format!("{}.json", uid))
    }
}

impl RemoteStore for DirRemoteStore {
    fn fetch(&self, uid: &str) -> Result<Option<RemoteDocument>, RemoteError> {
        let path = self.path_for(uid);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(RemoteError::Read { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(RemoteError::Corrupt)
    }

    fn store(&mut self, uid: &str, doc: &RemoteDocument) -> Result<(), RemoteError> {
        fs::create_dir_all(&self.dir).map_err(|source| RemoteError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(uid);
        let json = serde_json::to_string_pretty(doc).map_err(RemoteError::Corrupt)?;
        atomic_write(&path, json.as_bytes()).map_err(|source| RemoteError::Write { path, source })
    }
}

/// In-memory remote for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteStore {
    docs: HashMap<String, RemoteDocument>,
    /// When set, every call fails as if the network were down
    pub offline: bool,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(uid: &str, doc: RemoteDocument) -> Self {
        let mut store = Self::new();
        store.docs.insert(uid.to_string(), doc);
        store
    }

    pub fn document(&self, uid: &str) -> Option<&RemoteDocument> {
        self.docs.get(uid)
    }

    fn check_online(&self, writing: bool) -> Result<(), RemoteError> {
        if !self.offline {
            return Ok(());
        }
        let path = PathBuf::from("memory://remote");
        let source = io::Error::new(io::ErrorKind::NotConnected, "offline");
        Err(if writing {
            RemoteError::Write { path, source }
        } else {
            RemoteError::Read { path, source }
        })
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn fetch(&self, uid: &str) -> Result<Option<RemoteDocument>, RemoteError> {
        self.check_online(false)?;
        Ok(self.docs.get(uid).cloned())
    }

    fn store(&mut self, uid: &str, doc: &RemoteDocument) -> Result<(), RemoteError> {
        self.check_online(true)?;
        self.docs.insert(uid.to_string(), doc.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc() -> RemoteDocument {
        RemoteDocument {
            tasks: vec![Task::new(1, "remote task".into(), 1)],
            archive: vec![],
            memos: vec![],
            total_completed: 4,
            theme: Some("cyan".into()),
            command_history: None,
            last_updated: None,
        }
    }

    #[test]
    fn dir_store_missing_then_present() {
        let tmp = TempDir::new().unwrap();
        let mut remote = DirRemoteStore::new(tmp.path().join("cloud"));
        assert_eq!(remote.fetch("abc").unwrap(), None);
        remote.store("abc", &doc()).unwrap();
        assert_eq!(remote.fetch("abc").unwrap(), Some(doc()));
    }

    #[test]
    fn dir_store_reports_corrupt_documents() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("abc.json"), "{nope").unwrap();
        let remote = DirRemoteStore::new(tmp.path());
        assert!(matches!(remote.fetch("abc"), Err(RemoteError::Corrupt(_))));
    }

    #[test]
    fn document_accepts_minimal_shape() {
        let parsed: RemoteDocument =
            serde_json::from_str(r#"{"tasks":[{"id":1,"text":"a","done":false}],"totalCompleted":2}"#)
                .unwrap();
        assert_eq!(parsed.tasks.len(), 1);
        assert_eq!(parsed.total_completed, 2);
        assert!(parsed.archive.is_empty());
        assert!(parsed.theme.is_none());
    }

    #[test]
    fn offline_memory_store_fails() {
        let mut remote = MemoryRemoteStore::new();
        remote.offline = true;
        assert!(matches!(remote.fetch("x"), Err(RemoteError::Read { .. })));
        assert!(matches!(remote.store("x", &doc()), Err(RemoteError::Write { .. })));
    }
}
