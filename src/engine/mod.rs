//! Command engine: verb registry, dispatch, help and autocomplete.
//!
//! Handlers never touch the display. They return a structured
//! [`CommandResult`] or an [`Effect`] for the host to carry out.

pub mod autocomplete;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod result;

pub use autocomplete::Completion;
pub use error::CommandError;
pub use registry::{CommandEngine, CommandSpec, Context, Vocabulary};
pub use result::{CommandResult, Effect, Level, Reply};
