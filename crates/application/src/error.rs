//! Workflow error types

use scriptgen_domain::{DomainError, Notice, NoticeKind};
use thiserror::Error;

use crate::ports::{CatalogError, DownloadError, GenerationError, RemoteExportError};

/// Message shown when generation is triggered without a selection.
pub const SELECTION_REQUIRED: &str = "Please select an API first!";

/// Errors surfaced by the workflow. None of them is fatal; each becomes a notice.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// A precondition failed locally; nothing was sent to the network.
    #[error("{0}")]
    Validation(String),

    /// A catalog, generation, or remote export call failed.
    #[error("{0}")]
    Network(String),

    /// A local download could not be produced.
    #[error("{0}")]
    Encoding(String),
}

impl WorkflowError {
    /// Converts this error to a `Notice` for UI display.
    #[must_use]
    pub fn to_notice(&self) -> Notice {
        match self {
            Self::Validation(msg) => Notice::error(NoticeKind::Validation, msg.clone()),
            Self::Network(msg) => Notice::error(NoticeKind::Network, msg.clone()),
            Self::Encoding(msg) => Notice::error(NoticeKind::Encoding, msg.clone()),
        }
    }
}

impl From<DomainError> for WorkflowError {
    fn from(error: DomainError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<CatalogError> for WorkflowError {
    fn from(error: CatalogError) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<GenerationError> for WorkflowError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::SelectionRequired => Self::Validation(SELECTION_REQUIRED.to_string()),
            failed @ GenerationError::Failed { .. } => Self::Network(failed.to_string()),
        }
    }
}

impl From<RemoteExportError> for WorkflowError {
    fn from(error: RemoteExportError) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<DownloadError> for WorkflowError {
    fn from(error: DownloadError) -> Self {
        Self::Encoding(error.to_string())
    }
}

/// Result type alias for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selection_required_is_validation() {
        let error = WorkflowError::from(GenerationError::SelectionRequired);
        assert_eq!(
            error,
            WorkflowError::Validation("Please select an API first!".to_string())
        );
        assert_eq!(error.to_notice().kind, NoticeKind::Validation);
    }

    #[test]
    fn test_remote_detail_is_verbatim() {
        let error = WorkflowError::from(RemoteExportError::Failed {
            detail: "GitHub details not found".to_string(),
        });
        let notice = error.to_notice();
        assert_eq!(notice.kind, NoticeKind::Network);
        assert_eq!(
            notice.message,
            "Failed to export to GitHub: GitHub details not found"
        );
    }

    #[test]
    fn test_download_failure_is_encoding() {
        let error = WorkflowError::from(DownloadError::Encoding("disk full".to_string()));
        assert_eq!(error.to_notice().kind, NoticeKind::Encoding);
    }
}
