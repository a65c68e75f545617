pub mod config_io;
pub mod identity;
pub mod kv_store;
pub mod paths;
pub mod persistence;
pub mod remote;
pub mod sync;

pub use kv_store::{FileKvStore, KvStore, MemoryKvStore, StorageError};
pub use persistence::PersistenceBridge;
pub use remote::{RemoteDocument, RemoteError, RemoteStore};
pub use sync::SyncService;
