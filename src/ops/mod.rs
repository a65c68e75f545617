pub mod memo_ops;
pub mod store;
pub mod summary;
pub mod undo;

pub use store::{Listing, Removal, StoreData, TaskError, TaskStore};
pub use summary::{Stats, zenfetch_rows};
pub use undo::UndoBuffer;
