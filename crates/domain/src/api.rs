//! Registered API definitions and the per-user catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::method::HttpMethod;

/// Opaque identifier of a registered API definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ApiId(String);

impl ApiId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApiId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A previously registered description of a target HTTP endpoint.
///
/// Field names on the wire follow the catalog service
/// (`api_name`, `api_url`, `http_method`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDefinition {
    /// Catalog identifier.
    pub id: ApiId,
    /// Display name.
    #[serde(rename = "api_name")]
    pub name: String,
    /// Request URL of the endpoint.
    #[serde(rename = "api_url")]
    pub url: String,
    /// HTTP method of the endpoint.
    #[serde(rename = "http_method")]
    pub method: HttpMethod,
}

impl ApiDefinition {
    /// Creates a new API definition.
    #[must_use]
    pub fn new(
        id: impl Into<ApiId>,
        name: impl Into<String>,
        url: impl Into<String>,
        method: HttpMethod,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            method,
        }
    }

    /// One-line summary such as `GET https://x/users (Users API)`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} {} ({})", self.method, self.url, self.name)
    }
}

/// The list of API definitions fetched for the current user.
///
/// Entries are immutable once fetched; selection state refers to them by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiCatalog {
    entries: Vec<ApiDefinition>,
}

impl ApiCatalog {
    /// Creates a catalog from fetched entries.
    #[must_use]
    pub const fn new(entries: Vec<ApiDefinition>) -> Self {
        Self { entries }
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn get(&self, id: &ApiId) -> Option<&ApiDefinition> {
        self.entries.iter().find(|api| &api.id == id)
    }

    /// Returns true if an entry with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ApiId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over the entries in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = &ApiDefinition> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries as a slice.
    #[must_use]
    pub fn entries(&self) -> &[ApiDefinition] {
        &self.entries
    }
}

impl From<Vec<ApiDefinition>> for ApiCatalog {
    fn from(entries: Vec<ApiDefinition>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn users_api() -> ApiDefinition {
        ApiDefinition::new("a1", "Users API", "https://x/users", HttpMethod::Get)
    }

    #[test]
    fn test_deserialize_catalog_entry() {
        let json = r#"{
            "id": "a1",
            "api_name": "Users API",
            "api_url": "https://x/users",
            "http_method": "GET",
            "user_id": "u1",
            "payload": null,
            "created_at": "2024-01-01T00:00:00"
        }"#;
        let api: ApiDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(api, users_api());
    }

    #[test]
    fn test_blank_id() {
        assert!(ApiId::new("").is_blank());
        assert!(ApiId::new("   ").is_blank());
        assert!(!ApiId::new("a1").is_blank());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ApiCatalog::new(vec![
            users_api(),
            ApiDefinition::new("b2", "Orders", "https://x/orders", HttpMethod::Post),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&ApiId::new("b2")).unwrap().name, "Orders");
        assert!(catalog.contains(&ApiId::new("a1")));
        assert!(!catalog.contains(&ApiId::new("zz")));
    }

    #[test]
    fn test_summary() {
        assert_eq!(users_api().summary(), "GET https://x/users (Users API)");
    }
}
