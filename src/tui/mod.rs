pub mod alerts;
pub mod app;
pub mod input;
pub mod mode;
pub mod render;
pub mod theme;
pub mod wrap;

pub use app::run;
