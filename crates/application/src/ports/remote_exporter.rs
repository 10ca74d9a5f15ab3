//! Remote export port

use std::future::Future;

use scriptgen_domain::{ExportReceipt, RemoteExportRequest, SessionContext};
use thiserror::Error;

/// Error type for remote exports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteExportError {
    /// The endpoint rejected the export; `detail` is shown verbatim.
    #[error("Failed to export to GitHub: {detail}")]
    Failed {
        /// Server-provided detail.
        detail: String,
    },
}

/// Port for pushing script content to the source-control export endpoint.
pub trait RemoteExporter: Send + Sync {
    /// Submits the script under the given file name.
    ///
    /// # Errors
    ///
    /// Returns `RemoteExportError::Failed` when the call does not succeed.
    fn export(
        &self,
        session: &SessionContext,
        request: &RemoteExportRequest,
    ) -> impl Future<Output = Result<ExportReceipt, RemoteExportError>> + Send;
}
