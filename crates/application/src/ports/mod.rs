//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the workflow core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod catalog;
mod clock;
mod download_sink;
mod remote_exporter;
mod script_generator;

pub use catalog::{ApiCatalogSource, CatalogError};
pub use clock::Clock;
pub use download_sink::{DownloadError, DownloadSink};
pub use remote_exporter::{RemoteExportError, RemoteExporter};
pub use script_generator::{GenerationError, ScriptGenerator};
