//! File-backed download sink.
//!
//! Materializes export artifacts as files in a download directory. Each file
//! is written to a temporary sibling first and then atomically renamed into
//! place, so a failed export never leaves a partial file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use scriptgen_application::ports::{DownloadError, DownloadSink};
use scriptgen_domain::DownloadArtifact;
use tempfile::NamedTempFile;

/// Writes downloads into a fixed directory.
#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    /// Creates a sink that writes into `dir`, creating it on first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory downloads are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn check(artifact: &DownloadArtifact) -> Result<(), DownloadError> {
        artifact.mime_type.parse::<mime::Mime>().map_err(|e| {
            DownloadError::Encoding(format!("invalid MIME type {:?}: {e}", artifact.mime_type))
        })?;

        let plain_name = Path::new(&artifact.file_name)
            .file_name()
            .is_some_and(|name| name == artifact.file_name.as_str());
        if !plain_name {
            return Err(DownloadError::Encoding(format!(
                "invalid file name {:?}",
                artifact.file_name
            )));
        }
        Ok(())
    }
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(target).map_err(|e| e.error)?;
    Ok(())
}

impl DownloadSink for FileDownloadSink {
    async fn deliver(&self, artifact: &DownloadArtifact) -> Result<PathBuf, DownloadError> {
        Self::check(artifact)?;

        let dir = self.dir.clone();
        let target = dir.join(&artifact.file_name);
        let bytes = artifact.bytes.clone();

        let written = target.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &written, &bytes))
            .await
            .map_err(|e| DownloadError::Encoding(e.to_string()))?
            .map_err(|e| {
                DownloadError::Encoding(format!("could not write {}: {e}", target.display()))
            })?;

        tracing::info!(path = %target.display(), mime = %artifact.mime_type, "download written");
        Ok(target)
    }
}
