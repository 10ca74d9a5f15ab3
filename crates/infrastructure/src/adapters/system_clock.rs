//! System clock adapter

use chrono::{DateTime, Utc};
use scriptgen_application::ports::Clock;

/// Wall-clock time source for script timestamps and export file names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
