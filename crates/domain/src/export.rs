//! Export format types.
//!
//! This module provides the fixed format-to-MIME mapping used for local
//! downloads and the value objects exchanged with the remote export endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base name of every locally downloaded script.
pub const DOWNLOAD_BASE_NAME: &str = "generated_script";

/// Supported local download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// HTML document.
    #[default]
    Html,
    /// PDF document.
    Pdf,
    /// JSON document.
    Json,
    /// Plain text; also the fallback for unrecognized formats.
    #[serde(rename = "txt")]
    Text,
}

impl ExportFormat {
    /// Get all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Html, Self::Pdf, Self::Json, Self::Text]
    }

    /// Parses a user-supplied format name, falling back to plain text.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "html" => Self::Html,
            "pdf" => Self::Pdf,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Get the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }

    /// Get the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Pdf => "application/pdf",
            Self::Json => "application/json",
            Self::Text => "text/plain",
        }
    }

    /// Get the display name for this format.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Pdf => "PDF",
            Self::Json => "JSON",
            Self::Text => "TXT",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A downloadable artifact ready to be materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// MIME type of the artifact.
    pub mime_type: String,
    /// File extension without the dot.
    pub extension: String,
    /// Suggested file name.
    pub file_name: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

/// Converts script text into a download artifact for the given format.
///
/// The bytes are always the UTF-8 encoding of `script`; only the MIME type
/// and extension depend on the format.
#[must_use]
pub fn encode_for_download(script: &str, format: ExportFormat) -> DownloadArtifact {
    let extension = format.extension();
    DownloadArtifact {
        mime_type: format.mime_type().to_string(),
        extension: extension.to_string(),
        file_name: format!("{DOWNLOAD_BASE_NAME}.{extension}"),
        bytes: script.as_bytes().to_vec(),
    }
}

/// Body of a remote export call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteExportRequest {
    /// Owner the export is filed under.
    pub owner: String,
    /// Target file name.
    pub file_name: String,
    /// Script text at the moment of export.
    pub script_content: String,
}

/// Successful response from the remote export endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExportReceipt {
    /// Server-provided confirmation message.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_format_mapping() {
        let table = [
            (ExportFormat::Html, "text/html", "html"),
            (ExportFormat::Pdf, "application/pdf", "pdf"),
            (ExportFormat::Json, "application/json", "json"),
            (ExportFormat::Text, "text/plain", "txt"),
        ];
        for (format, mime, ext) in table {
            assert_eq!(format.mime_type(), mime);
            assert_eq!(format.extension(), ext);
        }
    }

    #[test]
    fn test_unrecognized_format_falls_back_to_text() {
        assert_eq!(ExportFormat::parse_lenient("docx"), ExportFormat::Text);
        assert_eq!(ExportFormat::parse_lenient(""), ExportFormat::Text);
        assert_eq!(ExportFormat::parse_lenient(" JSON "), ExportFormat::Json);
    }

    #[test]
    fn test_encode_for_download() {
        let artifact = encode_for_download("import requests...", ExportFormat::Json);
        assert_eq!(artifact.mime_type, "application/json");
        assert_eq!(artifact.extension, "json");
        assert_eq!(artifact.file_name, "generated_script.json");
        assert_eq!(artifact.bytes, "import requests...".as_bytes());
    }

    #[test]
    fn test_encode_keeps_unicode_bytes() {
        let artifact = encode_for_download("// café ✓", ExportFormat::parse_lenient("zip"));
        assert_eq!(artifact.mime_type, "text/plain");
        assert_eq!(artifact.file_name, "generated_script.txt");
        assert_eq!(String::from_utf8(artifact.bytes).ok().as_deref(), Some("// café ✓"));
    }

    #[test]
    fn test_export_request_wire_names() {
        let request = RemoteExportRequest {
            owner: "u1".to_string(),
            file_name: "test-script-1.js".to_string(),
            script_content: "x".to_string(),
        };
        let value = serde_json::to_value(&request).ok();
        assert_eq!(
            value,
            Some(serde_json::json!({
                "owner": "u1",
                "file_name": "test-script-1.js",
                "script_content": "x"
            }))
        );
    }
}
