//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The target language is not one the generation service knows.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The target test framework is not one the generation service knows.
    #[error("unsupported framework: {0}")]
    UnsupportedFramework(String),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// No catalog entry exists with the given id.
    #[error("unknown API: {0}")]
    UnknownApi(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
