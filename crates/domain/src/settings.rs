//! Client Settings Domain Model
//!
//! Defines where the backend lives and the user's default choices.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;
use crate::script::{ScriptLanguage, TestFramework};

/// Settings for the script generation client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the catalog listing endpoint.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path prefix of the generation and export endpoints.
    #[serde(default = "default_script_path")]
    pub script_path: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Directory downloads are written to; the working directory when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// User-Agent header sent to the backend.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Language preselected for generation.
    #[serde(default)]
    pub default_language: ScriptLanguage,

    /// Framework preselected for generation.
    #[serde(default)]
    pub default_framework: TestFramework,

    /// Format preselected for local export.
    #[serde(default)]
    pub default_export_format: ExportFormat,
}

fn default_base_url() -> String {
    "https://api.testyourapi.in".to_string()
}

fn default_catalog_path() -> String {
    "/api_management/apis".to_string()
}

fn default_script_path() -> String {
    "/api/script".to_string()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("scriptgen/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            catalog_path: default_catalog_path(),
            script_path: default_script_path(),
            timeout_ms: default_timeout_ms(),
            download_dir: None,
            user_agent: default_user_agent(),
            default_language: ScriptLanguage::default(),
            default_framework: TestFramework::default(),
            default_export_format: ExportFormat::default(),
        }
    }
}
