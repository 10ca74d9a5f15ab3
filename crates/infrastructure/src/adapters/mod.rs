//! Infrastructure adapters

mod rest_backend;
mod system_clock;

pub use rest_backend::{BackendError, RestBackend};
pub use system_clock::SystemClock;
