pub mod config;
pub mod memo;
pub mod session;
pub mod task;

pub use config::*;
pub use memo::*;
pub use session::*;
pub use task::*;
