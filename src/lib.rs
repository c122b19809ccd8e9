// Library exports for ani2sprite

pub mod config;
pub mod model;
pub mod pipeline;

pub use pipeline::{CursorError, CursorFormat, converter};
