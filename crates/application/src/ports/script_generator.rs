//! Script generation port

use std::future::Future;

use scriptgen_domain::{GenerationRequest, SessionContext};
use thiserror::Error;

/// Error type for generation requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No API definition was selected; the request never left the client.
    #[error("selection required")]
    SelectionRequired,

    /// The service answered with a non-success status or without a script.
    #[error("Failed to generate script: {reason}")]
    Failed {
        /// Server-provided or transport-level reason.
        reason: String,
    },
}

impl GenerationError {
    /// Creates a `Failed` error.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Port for the remote code-generation service.
pub trait ScriptGenerator: Send + Sync {
    /// Asks the service for a test script and returns its raw text.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Failed` if the call fails, the status is not
    /// a success, or the body has no `script` field.
    fn generate(
        &self,
        session: &SessionContext,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
