//! Download sink port

use std::future::Future;
use std::path::PathBuf;

use scriptgen_domain::DownloadArtifact;
use thiserror::Error;

/// Error type for materializing downloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DownloadError {
    /// The artifact could not be produced. No partial file is left behind.
    #[error("Failed to export report: {0}")]
    Encoding(String),
}

/// Port that offers an artifact to the user as a downloaded file.
///
/// Implementations must be all-or-nothing: either the complete file is
/// delivered or an error is returned and nothing is left behind.
pub trait DownloadSink: Send + Sync {
    /// Delivers the artifact and returns where it ended up.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::Encoding` if the artifact cannot be written.
    fn deliver(
        &self,
        artifact: &DownloadArtifact,
    ) -> impl Future<Output = Result<PathBuf, DownloadError>> + Send;
}
