//! Workflow state types for UI binding.
//!
//! This module defines the phases of the selection / generation / edit /
//! export workflow and the transient notices overlaid on them.

use serde::{Deserialize, Serialize};

/// Represents the current phase of the workflow.
///
/// - `Idle`: no API selected
/// - `Selected`: API chosen, no script yet
/// - `Generating`: generation request in flight
/// - `Ready`: script present and editable
/// - `Exporting`: an export is in flight; the script stays editable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// Nothing selected yet.
    #[default]
    Idle,
    /// An API is selected.
    Selected,
    /// A generation request is in flight.
    Generating,
    /// A script is installed.
    Ready,
    /// An export is in flight on top of a ready script.
    Exporting,
}

impl WorkflowPhase {
    /// Returns true if a script can be edited or exported in this phase.
    #[must_use]
    pub const fn has_script(&self) -> bool {
        matches!(self, Self::Ready | Self::Exporting)
    }

    /// Returns true while a generation request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Generating)
    }

    /// Short label for status lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selected => "selected",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Exporting => "exporting",
        }
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// Something failed; the workflow stays usable.
    Error,
}

/// What a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A precondition was not met; no network call was made.
    Validation,
    /// A catalog, generation, or remote export call failed.
    Network,
    /// A local download could not be produced.
    Encoding,
    /// An export finished.
    Exported,
}

/// A transient, user-visible message overlaid on the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Category.
    pub kind: NoticeKind,
    /// Human-readable message.
    pub message: String,
}

impl Notice {
    /// Creates an informational notice.
    #[must_use]
    pub fn info(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            kind,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            kind,
            message: message.into(),
        }
    }

    /// Returns true for error notices.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}
