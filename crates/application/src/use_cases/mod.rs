//! Application use cases (one per collaborator call).

mod export_download;
mod export_remote;
mod generate_script;
mod list_apis;

pub use export_download::*;
pub use export_remote::*;
pub use generate_script::*;
pub use list_apis::*;
