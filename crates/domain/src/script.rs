//! Generation targets, requests, and the generated script itself.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiId;
use crate::error::{DomainError, DomainResult};

/// Language the generated test script is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    /// JavaScript
    #[default]
    JavaScript,
    /// Python
    Python,
    /// Java
    Java,
}

impl ScriptLanguage {
    /// Get all available languages.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::JavaScript, Self::Python, Self::Java]
    }

    /// Value sent to the generation service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// Get display name for the language.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Java => "Java",
        }
    }

    /// Get source file extension for the language.
    #[must_use]
    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::Python => "py",
            Self::Java => "java",
        }
    }
}

impl fmt::Display for ScriptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ScriptLanguage {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "python" | "py" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            other => Err(DomainError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Test framework the generated script targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    /// Postman collection tests
    #[default]
    Postman,
    /// JUnit
    JUnit,
    /// Cypress
    Cypress,
}

impl TestFramework {
    /// Get all available frameworks.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Postman, Self::JUnit, Self::Cypress]
    }

    /// Value sent to the generation service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postman => "postman",
            Self::JUnit => "junit",
            Self::Cypress => "cypress",
        }
    }

    /// Get display name for the framework.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Postman => "Postman",
            Self::JUnit => "JUnit",
            Self::Cypress => "Cypress",
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TestFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "postman" => Ok(Self::Postman),
            "junit" => Ok(Self::JUnit),
            "cypress" => Ok(Self::Cypress),
            other => Err(DomainError::UnsupportedFramework(other.to_string())),
        }
    }
}

/// A single request to the generation service.
///
/// Built fresh every time generation is triggered; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Id of the selected API definition.
    pub api_id: ApiId,
    /// Target language.
    pub language: ScriptLanguage,
    /// Target framework.
    pub framework: TestFramework,
}

impl GenerationRequest {
    /// Creates a new generation request.
    #[must_use]
    pub const fn new(api_id: ApiId, language: ScriptLanguage, framework: TestFramework) -> Self {
        Self {
            api_id,
            language,
            framework,
        }
    }
}

/// The script currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    content: String,
    /// API the script was generated for.
    pub api_id: ApiId,
    /// Language it was generated in.
    pub language: ScriptLanguage,
    /// Framework it targets.
    pub framework: TestFramework,
    /// When the generation result arrived.
    pub generated_at: DateTime<Utc>,
    edited: bool,
}

impl GeneratedScript {
    /// Wraps a freshly generated script for the given request.
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        request: &GenerationRequest,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            api_id: request.api_id.clone(),
            language: request.language,
            framework: request.framework,
            generated_at,
            edited: false,
        }
    }

    /// Current text, including any hand edits.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns true once the user has modified the text.
    #[must_use]
    pub const fn is_edited(&self) -> bool {
        self.edited
    }

    /// Replaces the text with a user edit.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.edited = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_language_parse() {
        assert_eq!(
            "Python".parse::<ScriptLanguage>().unwrap(),
            ScriptLanguage::Python
        );
        assert_eq!(
            "js".parse::<ScriptLanguage>().unwrap(),
            ScriptLanguage::JavaScript
        );
        assert!("cobol".parse::<ScriptLanguage>().is_err());
    }

    #[test]
    fn test_framework_parse() {
        assert_eq!(
            "JUNIT".parse::<TestFramework>().unwrap(),
            TestFramework::JUnit
        );
        assert_eq!(
            "cypress".parse::<TestFramework>().unwrap(),
            TestFramework::Cypress
        );
        assert_eq!(
            "mocha".parse::<TestFramework>(),
            Err(DomainError::UnsupportedFramework("mocha".to_string()))
        );
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(ScriptLanguage::Java.as_str(), "java");
        assert_eq!(TestFramework::Postman.as_str(), "postman");
        assert_eq!(ScriptLanguage::Python.file_extension(), "py");
    }

    #[test]
    fn test_edit_marks_script() {
        let request = GenerationRequest::new(
            ApiId::new("a1"),
            ScriptLanguage::Python,
            TestFramework::Postman,
        );
        let mut script = GeneratedScript::new("import requests", &request, Utc::now());
        assert!(!script.is_edited());

        script.edit("import requests\nprint(1)");
        assert!(script.is_edited());
        assert_eq!(script.content(), "import requests\nprint(1)");
        assert_eq!(script.language, ScriptLanguage::Python);
    }
}
