//! Clock port for generation timestamps and export file names

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// Generation timestamps and remote export file names come from here so
/// tests can pin them.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
