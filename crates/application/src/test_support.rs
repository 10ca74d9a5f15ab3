//! Hand-written port mocks shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use scriptgen_domain::{
    ApiDefinition, DownloadArtifact, ExportReceipt, GenerationRequest, HttpMethod,
    RemoteExportRequest, SessionContext,
};

use crate::ports::{
    ApiCatalogSource, CatalogError, Clock, DownloadError, DownloadSink, GenerationError,
    RemoteExportError, RemoteExporter, ScriptGenerator,
};

pub fn users_api() -> ApiDefinition {
    ApiDefinition::new("a1", "Users API", "https://x/users", HttpMethod::Get)
}

pub fn orders_api() -> ApiDefinition {
    ApiDefinition::new("b2", "Orders API", "https://x/orders", HttpMethod::Post)
}

pub struct MockCatalog {
    result: Mutex<Result<Vec<ApiDefinition>, CatalogError>>,
    calls: AtomicUsize,
    last_user: Mutex<Option<String>>,
}

impl MockCatalog {
    pub fn returning(entries: Vec<ApiDefinition>) -> Self {
        Self {
            result: Mutex::new(Ok(entries)),
            calls: AtomicUsize::new(0),
            last_user: Mutex::new(None),
        }
    }

    pub fn failing(reason: &str) -> Self {
        let mock = Self::returning(Vec::new());
        *mock.result.lock().unwrap() = Err(CatalogError::Unavailable(reason.to_string()));
        mock
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user(&self) -> Option<String> {
        self.last_user.lock().unwrap().clone()
    }
}

impl ApiCatalogSource for MockCatalog {
    async fn list_apis(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<ApiDefinition>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user.lock().unwrap() = Some(session.user_id.clone());
        self.result.lock().unwrap().clone()
    }
}

type Scripted = (Result<String, GenerationError>, Option<Duration>);

#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, script: &str) {
        self.push(Ok(script.to_string()), None);
    }

    pub fn push_err(&self, reason: &str) {
        self.push(Err(GenerationError::failed(reason)), None);
    }

    pub fn push_delayed(&self, script: &str, delay: Duration) {
        self.push(Ok(script.to_string()), Some(delay));
    }

    fn push(&self, result: Result<String, GenerationError>, delay: Option<Duration>) {
        self.responses.lock().unwrap().push_back((result, delay));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ScriptGenerator for MockGenerator {
    async fn generate(
        &self,
        _session: &SessionContext,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        let (result, delay) = next.unwrap_or_else(|| (Ok("// script".to_string()), None));
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

pub struct MockExporter {
    result: Result<ExportReceipt, RemoteExportError>,
    requests: Mutex<Vec<RemoteExportRequest>>,
}

impl MockExporter {
    pub fn accepting(message: &str) -> Self {
        Self {
            result: Ok(ExportReceipt {
                message: message.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(detail: &str) -> Self {
        Self {
            result: Err(RemoteExportError::Failed {
                detail: detail.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RemoteExportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl RemoteExporter for MockExporter {
    async fn export(
        &self,
        _session: &SessionContext,
        request: &RemoteExportRequest,
    ) -> Result<ExportReceipt, RemoteExportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.result.clone()
    }
}

#[derive(Default)]
pub struct MockSink {
    fail: bool,
    delivered: Mutex<Vec<DownloadArtifact>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn delivered(&self) -> Vec<DownloadArtifact> {
        self.delivered.lock().unwrap().clone()
    }
}

impl DownloadSink for MockSink {
    async fn deliver(&self, artifact: &DownloadArtifact) -> Result<PathBuf, DownloadError> {
        if self.fail {
            return Err(DownloadError::Encoding("disk full".to_string()));
        }
        self.delivered.lock().unwrap().push(artifact.clone());
        Ok(PathBuf::from(&artifact.file_name))
    }
}

#[derive(Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst))
            .single()
            .unwrap()
    }
}
