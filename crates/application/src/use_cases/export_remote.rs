//! Export to remote use case (the remote export dispatcher).

use std::sync::Arc;

use scriptgen_domain::{ExportReceipt, RemoteExportRequest, ScriptLanguage, SessionContext};

use crate::ports::{RemoteExportError, RemoteExporter};

/// Message shown when the endpoint confirms without a message of its own.
pub const DEFAULT_EXPORT_MESSAGE: &str = "Exported to GitHub successfully!";

/// Produces `test-script-<epoch-ms>.<ext>` names that never repeat.
///
/// The millisecond suffix strictly increases even if the clock stalls or
/// steps backwards between two exports.
#[derive(Debug, Default)]
pub struct ExportFileNamer {
    last_millis: Option<i64>,
}

impl ExportFileNamer {
    /// Creates a namer with no history.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_millis: None }
    }

    /// Returns the next file name for a script in `language`.
    pub fn next_name(&mut self, now_millis: i64, language: ScriptLanguage) -> String {
        let millis = match self.last_millis {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last_millis = Some(millis);
        format!("test-script-{millis}.{}", language.file_extension())
    }
}

/// Use case for pushing a script to the external export endpoint.
pub struct ExportToRemote<R: RemoteExporter> {
    exporter: Arc<R>,
}

impl<R: RemoteExporter> ExportToRemote<R> {
    /// Creates a new `ExportToRemote` use case.
    pub const fn new(exporter: Arc<R>) -> Self {
        Self { exporter }
    }

    /// Submits the export and returns the confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `RemoteExportError::Failed` with the server detail.
    pub async fn execute(
        &self,
        session: &SessionContext,
        request: &RemoteExportRequest,
    ) -> Result<ExportReceipt, RemoteExportError> {
        let mut receipt = self.exporter.export(session, request).await?;
        if receipt.message.trim().is_empty() {
            receipt.message = DEFAULT_EXPORT_MESSAGE.to_string();
        }
        tracing::info!(file = %request.file_name, "remote export accepted");
        Ok(receipt)
    }
}

impl<R: RemoteExporter> Clone for ExportToRemote<R> {
    fn clone(&self) -> Self {
        Self {
            exporter: Arc::clone(&self.exporter),
        }
    }
}
