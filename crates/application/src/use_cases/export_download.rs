//! Export download use case (the export encoder in download mode).

use std::path::PathBuf;
use std::sync::Arc;

use scriptgen_domain::{ExportFormat, encode_for_download};

use crate::ports::{DownloadError, DownloadSink};

/// Where a local export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDownload {
    /// Format that was exported.
    pub format: ExportFormat,
    /// MIME type of the artifact.
    pub mime_type: String,
    /// Location of the delivered file.
    pub path: PathBuf,
}

impl SavedDownload {
    /// Confirmation shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Report exported as {} successfully!",
            self.format.extension().to_uppercase()
        )
    }
}

/// Use case for encoding the script and offering it as a download.
pub struct ExportDownload<S: DownloadSink> {
    sink: Arc<S>,
}

impl<S: DownloadSink> ExportDownload<S> {
    /// Creates a new `ExportDownload` use case.
    pub const fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    /// Encodes `content` for `format` and delivers it.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::Encoding` if the sink cannot deliver the file.
    pub async fn execute(
        &self,
        content: &str,
        format: ExportFormat,
    ) -> Result<SavedDownload, DownloadError> {
        let artifact = encode_for_download(content, format);
        let path = self.sink.deliver(&artifact).await?;
        tracing::info!(path = %path.display(), mime = %artifact.mime_type, "download delivered");

        Ok(SavedDownload {
            format,
            mime_type: artifact.mime_type,
            path,
        })
    }
}

impl<S: DownloadSink> Clone for ExportDownload<S> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}
