//! Scriptgen Domain - Core business types
//!
//! This crate defines the domain model for the test-script generation
//! and export workflow. All types here are pure Rust with no I/O dependencies.

pub mod api;
pub mod error;
pub mod export;
pub mod method;
pub mod script;
pub mod session;
pub mod settings;
pub mod state;

pub use api::{ApiCatalog, ApiDefinition, ApiId};
pub use error::{DomainError, DomainResult};
pub use export::{
    DownloadArtifact, ExportFormat, ExportReceipt, RemoteExportRequest, encode_for_download,
};
pub use method::HttpMethod;
pub use script::{GeneratedScript, GenerationRequest, ScriptLanguage, TestFramework};
pub use session::SessionContext;
pub use settings::ClientSettings;
pub use state::{Notice, NoticeKind, NoticeLevel, WorkflowPhase};
