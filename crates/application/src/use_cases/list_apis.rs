//! List APIs use case (the catalog accessor).

use std::sync::Arc;

use scriptgen_domain::{ApiCatalog, SessionContext};

use crate::ports::{ApiCatalogSource, CatalogError};

/// Use case for fetching the current user's API catalog.
pub struct ListApis<C: ApiCatalogSource> {
    source: Arc<C>,
}

impl<C: ApiCatalogSource> ListApis<C> {
    /// Creates a new `ListApis` use case.
    pub const fn new(source: Arc<C>) -> Self {
        Self { source }
    }

    /// Fetches the catalog for the session's user.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` on network or parse failure.
    /// Callers treat that as an empty catalog.
    pub async fn execute(&self, session: &SessionContext) -> Result<ApiCatalog, CatalogError> {
        let entries = self.source.list_apis(session).await?;
        tracing::debug!(user = %session.user_id, count = entries.len(), "catalog fetched");
        Ok(ApiCatalog::new(entries))
    }
}

impl<C: ApiCatalogSource> Clone for ListApis<C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}
