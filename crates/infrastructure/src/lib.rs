//! Scriptgen Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: the reqwest backend client,
//! the file download sink, the system clock, and the settings file.

pub mod adapters;
pub mod persistence;
pub mod serialization;

pub use adapters::{BackendError, RestBackend, SystemClock};
pub use persistence::{
    ENV_BASE_URL, ENV_DOWNLOAD_DIR, ENV_TIMEOUT_MS, FileDownloadSink, SettingsError,
    SettingsRepository, apply_env_overrides,
};
pub use serialization::{
    SerializationError, from_json_bytes, to_json_stable,
};
