//! API catalog port

use std::future::Future;

use scriptgen_domain::{ApiDefinition, SessionContext};
use thiserror::Error;

/// Error returned when the catalog cannot be fetched or decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Network or parse failure.
    #[error("Could not load APIs: {0}")]
    Unavailable(String),
}

/// Port for listing the API definitions registered by a user.
pub trait ApiCatalogSource: Send + Sync {
    /// Fetches every API definition registered by the session's user.
    ///
    /// The catalog is a single unpaginated page.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` on network or parse failure.
    fn list_apis(
        &self,
        session: &SessionContext,
    ) -> impl Future<Output = Result<Vec<ApiDefinition>, CatalogError>> + Send;
}
