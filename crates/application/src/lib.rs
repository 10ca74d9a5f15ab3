//! Scriptgen Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the catalog, generation, export, and download collaborators)
//! - Use cases wrapping each collaborator call
//! - The workflow state machine and its request-token sequencing
//! - A channel-driven runner that keeps responses from racing each other

pub mod error;
pub mod ports;
pub mod runner;
pub mod sequencer;
pub mod use_cases;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use error::{WorkflowError, WorkflowResult};
pub use ports::{
    ApiCatalogSource, CatalogError, Clock, DownloadError, DownloadSink, GenerationError,
    RemoteExportError, RemoteExporter, ScriptGenerator,
};
pub use runner::{WorkflowCommand, WorkflowRunner, WorkflowSnapshot, WorkflowUpdate};
pub use sequencer::{RequestSequencer, RequestToken};
pub use use_cases::{
    ExportDownload, ExportFileNamer, ExportToRemote, GenerateScript, ListApis, SavedDownload,
};
pub use workflow::{
    CatalogTicket, Completion, GenerationTicket, LocalExportJob, Orchestrator, RemoteExportJob,
    ScriptWorkflow, WorkflowServices,
};
