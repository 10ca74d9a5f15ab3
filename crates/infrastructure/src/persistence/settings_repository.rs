//! Client settings persistence.
//!
//! Reads settings from the platform-specific config directory:
//! - Linux: ~/.config/scriptgen/settings.json
//! - macOS: ~/Library/Application Support/scriptgen/settings.json
//! - Windows: %APPDATA%/scriptgen/settings.json
//!
//! Values from the file can be overridden through environment variables.

use std::path::{Path, PathBuf};

use scriptgen_domain::ClientSettings;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes};

/// Overrides `ClientSettings::base_url`.
pub const ENV_BASE_URL: &str = "SCRIPTGEN_BASE_URL";
/// Overrides `ClientSettings::timeout_ms`.
pub const ENV_TIMEOUT_MS: &str = "SCRIPTGEN_TIMEOUT_MS";
/// Overrides `ClientSettings::download_dir`.
pub const ENV_DOWNLOAD_DIR: &str = "SCRIPTGEN_DOWNLOAD_DIR";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Malformed settings file: {0}")]
    Serialization(#[from] SerializationError),

    /// An environment override could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidOverride {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Repository for client settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    path: Option<PathBuf>,
}

impl Default for SettingsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsRepository {
    /// Creates a repository at the default location.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: dirs::config_dir().map(|p| p.join("scriptgen").join("settings.json")),
        }
    }

    /// Creates a repository backed by an explicit file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the path where settings are stored, if available.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads settings from disk.
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<ClientSettings, SettingsError> {
        let Some(path) = &self.path else {
            return Ok(ClientSettings::default());
        };

        match fs::read(path).await {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "settings loaded");
                Ok(from_json_bytes(&content)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientSettings::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads settings and applies the process environment on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or an override is invalid.
    pub async fn load_with_env(&self) -> Result<ClientSettings, SettingsError> {
        let mut settings = self.load().await?;
        apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
        Ok(settings)
    }
}

/// Applies `SCRIPTGEN_*` overrides read through `lookup`.
///
/// Empty values are ignored.
///
/// # Errors
///
/// Returns `SettingsError::InvalidOverride` if the timeout is not a number.
pub fn apply_env_overrides(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(base_url) = get(ENV_BASE_URL) {
        settings.base_url = base_url;
    }
    if let Some(raw) = get(ENV_TIMEOUT_MS) {
        settings.timeout_ms = raw
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidOverride {
                name: ENV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
    }
    if let Some(dir) = get(ENV_DOWNLOAD_DIR) {
        settings.download_dir = Some(PathBuf::from(dir));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scriptgen_domain::ScriptLanguage;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_path_ends_with_scriptgen_settings() {
        if let Some(path) = SettingsRepository::new().path() {
            assert!(path.ends_with("scriptgen/settings.json"));
        }
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SettingsRepository::at(dir.path().join("settings.json"));

        assert_eq!(repo.load().await.unwrap(), ClientSettings::default());
    }

    #[tokio::test]
    async fn test_file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            br#"{ "base_url": "http://localhost:8000", "default_language": "java" }"#,
        )
        .unwrap();

        let settings = SettingsRepository::at(path).load().await.unwrap();
        assert_eq!(settings.base_url, "http://localhost:8000");
        assert_eq!(settings.default_language, ScriptLanguage::Java);
        assert_eq!(settings.timeout_ms, ClientSettings::default().timeout_ms);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, b"{ base_url: ").unwrap();

        let result = SettingsRepository::at(path).load().await;
        assert!(matches!(result, Err(SettingsError::Serialization(_))));
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut settings = ClientSettings::default();
        apply_env_overrides(
            &mut settings,
            vars(&[
                (ENV_BASE_URL, "http://127.0.0.1:9000"),
                (ENV_TIMEOUT_MS, " 2500 "),
                (ENV_DOWNLOAD_DIR, "/tmp/out"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.base_url, "http://127.0.0.1:9000");
        assert_eq!(settings.timeout_ms, 2_500);
        assert_eq!(settings.download_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let mut settings = ClientSettings::default();
        apply_env_overrides(&mut settings, vars(&[(ENV_BASE_URL, "")])).unwrap();
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn test_bad_timeout_override_is_rejected() {
        let mut settings = ClientSettings::default();
        let result = apply_env_overrides(&mut settings, vars(&[(ENV_TIMEOUT_MS, "soon")]));

        assert!(matches!(
            result,
            Err(SettingsError::InvalidOverride { name: ENV_TIMEOUT_MS, .. })
        ));
    }
}
