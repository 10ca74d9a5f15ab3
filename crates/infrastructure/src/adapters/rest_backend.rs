//! Backend client implementation using reqwest.
//!
//! This adapter implements the catalog, generation, and remote export ports
//! against the script backend's REST endpoints:
//!
//! - `GET  {base}{catalog_path}?user_id=<id>`
//! - `POST {base}{script_path}/generate_script?api_id=&language=&framework=`
//! - `POST {base}{script_path}/export_script` with a JSON body
//!
//! The bearer token comes from the `SessionContext` passed to each call.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use scriptgen_application::ports::{
    ApiCatalogSource, CatalogError, GenerationError, RemoteExportError, RemoteExporter,
    ScriptGenerator,
};
use scriptgen_domain::{
    ApiDefinition, ClientSettings, ExportReceipt, GenerationRequest, RemoteExportRequest,
    SessionContext,
};
use serde::Deserialize;
use url::Url;

const GENERATE_ROUTE: &str = "generate_script";
const EXPORT_ROUTE: &str = "export_script";

/// Errors raised while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The configured base URL or path does not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The backend could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The backend answered with a non-success status.
    ///
    /// `detail` is the server's `detail` field when present, else `HTTP <status>`.
    #[error("{detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message to surface to the user.
        detail: String,
    },

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Anything else reqwest reported.
    #[error("{0}")]
    Other(String),
}

#[derive(Deserialize)]
struct ScriptBody {
    script: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// REST client for the script backend.
pub struct RestBackend {
    client: Client,
    settings: ClientSettings,
}

impl RestBackend {
    /// Creates a backend client from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn new(settings: ClientSettings) -> Result<Self, BackendError> {
        Url::parse(&settings.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{e}: {}", settings.base_url)))?;

        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| BackendError::Other(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Creates a backend client around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, settings: ClientSettings) -> Self {
        Self { client, settings }
    }

    /// Settings the client was built with.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Joins the base URL, a configured path prefix, and an optional route.
    fn endpoint(&self, prefix: &str, route: Option<&str>) -> Result<Url, BackendError> {
        let mut raw = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            prefix.trim_matches('/')
        );
        if let Some(route) = route {
            raw.push('/');
            raw.push_str(route);
        }
        Url::parse(&raw).map_err(|e| BackendError::InvalidUrl(format!("{e}: {raw}")))
    }

    fn authorize(builder: RequestBuilder, session: &SessionContext) -> RequestBuilder {
        match &session.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request, turning non-success statuses into `BackendError::Status`.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(e, self.settings.timeout_ms))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        tracing::warn!(status = status.as_u16(), %detail, "backend returned an error");
        Err(BackendError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    async fn read_body(response: Response) -> Result<Vec<u8>, BackendError> {
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    /// Maps reqwest errors to `BackendError`.
    fn map_error(error: reqwest::Error, timeout_ms: u64) -> BackendError {
        if error.is_timeout() {
            return BackendError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            return BackendError::Connection(error.to_string());
        }
        if error.is_decode() {
            return BackendError::InvalidResponse(error.to_string());
        }
        BackendError::Other(error.to_string())
    }

    async fn fetch_catalog(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<ApiDefinition>, BackendError> {
        let mut url = self.endpoint(&self.settings.catalog_path, None)?;
        url.query_pairs_mut().append_pair("user_id", &session.user_id);

        tracing::debug!(%url, "fetching catalog");
        let response = self
            .send(Self::authorize(self.client.get(url), session))
            .await?;
        decode_catalog(&Self::read_body(response).await?)
    }

    async fn request_script(
        &self,
        session: &SessionContext,
        request: &GenerationRequest,
    ) -> Result<String, BackendError> {
        let mut url = self.endpoint(&self.settings.script_path, Some(GENERATE_ROUTE))?;
        url.query_pairs_mut()
            .append_pair("api_id", request.api_id.as_str())
            .append_pair("language", request.language.as_str())
            .append_pair("framework", request.framework.as_str());

        tracing::debug!(api = %request.api_id, "requesting script");
        let response = self
            .send(Self::authorize(self.client.post(url), session))
            .await?;
        let body: ScriptBody = serde_json::from_slice(&Self::read_body(response).await?)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        body.script.ok_or_else(|| {
            BackendError::InvalidResponse("response did not contain a script".to_string())
        })
    }

    async fn push_script(
        &self,
        session: &SessionContext,
        request: &RemoteExportRequest,
    ) -> Result<ExportReceipt, BackendError> {
        let url = self.endpoint(&self.settings.script_path, Some(EXPORT_ROUTE))?;

        tracing::debug!(file = %request.file_name, "pushing script");
        let response = self
            .send(Self::authorize(self.client.post(url).json(request), session))
            .await?;
        let body = Self::read_body(response).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ExportReceipt::default());
        }
        serde_json::from_slice(&body).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// Decodes a catalog body, skipping entries that do not decode.
fn decode_catalog(body: &[u8]) -> Result<Vec<ApiDefinition>, BackendError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
    let serde_json::Value::Array(items) = value else {
        return Err(BackendError::InvalidResponse(
            "expected a JSON array of APIs".to_string(),
        ));
    };

    let total = items.len();
    let apis: Vec<ApiDefinition> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(api) => Some(api),
            Err(error) => {
                tracing::warn!(%error, "skipping undecodable catalog entry");
                None
            }
        })
        .collect();

    tracing::debug!(total, decoded = apis.len(), "catalog decoded");
    Ok(apis)
}

/// Extracts the message to show for a failed call.
fn error_detail(status: StatusCode, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
        .map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
        .filter(|detail| !detail.trim().is_empty());

    detail.unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

impl ApiCatalogSource for RestBackend {
    async fn list_apis(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<ApiDefinition>, CatalogError> {
        self.fetch_catalog(session)
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }
}

impl ScriptGenerator for RestBackend {
    async fn generate(
        &self,
        session: &SessionContext,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        self.request_script(session, request)
            .await
            .map_err(|e| GenerationError::failed(e.to_string()))
    }
}

impl RemoteExporter for RestBackend {
    async fn export(
        &self,
        session: &SessionContext,
        request: &RemoteExportRequest,
    ) -> Result<ExportReceipt, RemoteExportError> {
        self.push_script(session, request)
            .await
            .map_err(|e| RemoteExportError::Failed {
                detail: e.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use scriptgen_domain::{ApiId, HttpMethod, ScriptLanguage, TestFramework};
    use serde_json::json;

    fn backend(server: &mockito::Server) -> RestBackend {
        RestBackend::new(ClientSettings {
            base_url: server.url(),
            timeout_ms: 5_000,
            ..ClientSettings::default()
        })
        .unwrap()
    }

    fn session() -> SessionContext {
        SessionContext::new("u1").with_token("secret")
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = RestBackend::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        });
        assert!(matches!(result, Err(BackendError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_detail_prefers_server_message() {
        let body = br#"{"detail": "API details not found."}"#;
        assert_eq!(
            error_detail(StatusCode::NOT_FOUND, body),
            "API details not found."
        );
        assert_eq!(
            error_detail(StatusCode::INTERNAL_SERVER_ERROR, b"oops"),
            "HTTP 500"
        );
        assert_eq!(
            error_detail(StatusCode::UNPROCESSABLE_ENTITY, br#"{"detail": [{"msg": "x"}]}"#),
            r#"[{"msg":"x"}]"#
        );
    }

    #[test]
    fn test_decode_catalog_skips_bad_entries() {
        let body = json!([
            {"id": "a1", "api_name": "Users API", "api_url": "https://x/users", "http_method": "get",
             "payload": null, "headers": null, "created_at": "2024-01-01T00:00:00"},
            {"id": "a2", "api_name": "Broken", "api_url": "https://x/b", "http_method": "TRACE"},
            {"api_name": "No id"}
        ]);
        let apis = decode_catalog(body.to_string().as_bytes()).unwrap();

        assert_eq!(
            apis,
            vec![ApiDefinition::new(
                "a1",
                "Users API",
                "https://x/users",
                HttpMethod::Get
            )]
        );
    }

    #[test]
    fn test_decode_catalog_rejects_non_array() {
        let result = decode_catalog(br#"{"detail": "nope"}"#);
        assert!(matches!(result, Err(BackendError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_list_apis_sends_user_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api_management/apis")
            .match_query(Matcher::UrlEncoded("user_id".into(), "u1".into()))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{"id": "a1", "api_name": "Users API", "api_url": "https://x/users", "http_method": "GET"}])
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let apis = backend(&server).list_apis(&session()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(apis.len(), 1);
        assert_eq!(apis[0].id, ApiId::new("a1"));
    }

    #[tokio::test]
    async fn test_list_apis_failure_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api_management/apis")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"detail": "database down"}"#)
            .create_async()
            .await;

        let result = backend(&server).list_apis(&session()).await;

        assert_eq!(
            result,
            Err(CatalogError::Unavailable("database down".to_string()))
        );
    }

    #[tokio::test]
    async fn test_generate_sends_query_and_reads_script() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/script/generate_script")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_id".into(), "a1".into()),
                Matcher::UrlEncoded("language".into(), "python".into()),
                Matcher::UrlEncoded("framework".into(), "postman".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"script": "import requests"}"#)
            .expect(1)
            .create_async()
            .await;

        let request = GenerationRequest::new(
            ApiId::new("a1"),
            ScriptLanguage::Python,
            TestFramework::Postman,
        );
        let script = backend(&server).generate(&session(), &request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(script, "import requests");
    }

    #[tokio::test]
    async fn test_generate_without_script_field_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/script/generate_script")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message": "ok"}"#)
            .create_async()
            .await;

        let request =
            GenerationRequest::new(ApiId::new("a1"), ScriptLanguage::Java, TestFramework::JUnit);
        let result = backend(&server).generate(&session(), &request).await;

        assert!(matches!(result, Err(GenerationError::Failed { .. })));
    }

    #[tokio::test]
    async fn test_generate_http_500_surfaces_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/script/generate_script")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"detail": "Failed to generate script: model offline"}"#)
            .create_async()
            .await;

        let request = GenerationRequest::new(
            ApiId::new("a1"),
            ScriptLanguage::JavaScript,
            TestFramework::Cypress,
        );
        let result = backend(&server).generate(&session(), &request).await;

        assert_eq!(
            result,
            Err(GenerationError::failed(
                "Failed to generate script: model offline"
            ))
        );
    }

    #[tokio::test]
    async fn test_export_posts_body_and_reads_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/script/export_script")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Json(json!({
                "owner": "u1",
                "file_name": "test-script-1.js",
                "script_content": "pm.test()"
            })))
            .with_status(200)
            .with_body(r#"{"message": "File pushed to repo"}"#)
            .expect(1)
            .create_async()
            .await;

        let request = RemoteExportRequest {
            owner: "u1".to_string(),
            file_name: "test-script-1.js".to_string(),
            script_content: "pm.test()".to_string(),
        };
        let receipt = backend(&server).export(&session(), &request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.message, "File pushed to repo");
    }

    #[tokio::test]
    async fn test_export_rejection_carries_detail_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/script/export_script")
            .with_status(404)
            .with_body(r#"{"detail": "GitHub details not found"}"#)
            .create_async()
            .await;

        let request = RemoteExportRequest {
            owner: "u1".to_string(),
            file_name: "test-script-1.js".to_string(),
            script_content: String::new(),
        };
        let result = backend(&server).export(&session(), &request).await;

        assert_eq!(
            result,
            Err(RemoteExportError::Failed {
                detail: "GitHub details not found".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let backend = RestBackend::new(ClientSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 2_000,
            ..ClientSettings::default()
        })
        .unwrap();

        let result = backend.fetch_catalog(&session()).await;
        assert!(matches!(
            result,
            Err(BackendError::Connection(_) | BackendError::Timeout { .. } | BackendError::Other(_))
        ));
    }
}
