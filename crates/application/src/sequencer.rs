//! Request tokens for stale-response suppression.
//!
//! Every dispatch of a given kind takes a token from its sequencer. When the
//! response arrives, it is applied only if its token is still the latest one
//! issued; anything older is discarded, whatever the arrival order.

use std::fmt;

/// Monotonically increasing identifier of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tokens for one kind of request.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    /// Creates a sequencer that has issued nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issues a new token, superseding every earlier one.
    pub const fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Returns true if `token` is the most recently issued one.
    #[must_use]
    pub const fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Makes every outstanding token stale without issuing a new request.
    pub const fn invalidate(&mut self) {
        self.latest += 1;
    }
}
