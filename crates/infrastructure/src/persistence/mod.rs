//! File-based storage: the settings file and exported downloads.

mod download_sink;
mod settings_repository;

pub use download_sink::*;
pub use settings_repository::*;
