//! zen: a to-do list, memo pad and focus timer behind one command line.
//!
//! The [`engine`] turns a submitted line into a [`engine::CommandResult`] or
//! an [`engine::Effect`] for the host. [`runtime::Runtime`] wires the engine
//! to the task store, persistence and sync; [`tui`] and `zen run` drive it.

pub mod cli;
pub mod engine;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod parse;
pub mod runtime;
pub mod tui;
pub mod util;
