//! Workflow orchestrator.
//!
//! `ScriptWorkflow` owns the selection / generation / edit / export state.
//! Each asynchronous step is split into a `begin_*` call that snapshots its
//! inputs and issues a request token, and a `complete_*` call that applies the
//! outcome only if the token is still current. `Orchestrator` chains the two
//! around the use cases for sequential callers; `WorkflowRunner` does the same
//! with spawned tasks.

use std::sync::Arc;

use scriptgen_domain::{
    ApiCatalog, ApiDefinition, ApiId, ExportFormat, ExportReceipt, GeneratedScript,
    GenerationRequest, Notice, NoticeKind, RemoteExportRequest, ScriptLanguage, SessionContext,
    TestFramework, WorkflowPhase,
};

use crate::error::{WorkflowError, WorkflowResult};
use crate::ports::{
    ApiCatalogSource, CatalogError, Clock, DownloadError, DownloadSink, GenerationError,
    RemoteExportError, RemoteExporter, ScriptGenerator,
};
use crate::sequencer::{RequestSequencer, RequestToken};
use crate::use_cases::{
    ExportDownload, ExportFileNamer, ExportToRemote, GenerateScript, ListApis, SavedDownload,
};

/// Shown in place of the script while none is installed.
pub const EMPTY_PREVIEW: &str = "No script generated yet.";

/// Shown in place of the script after a failed generation.
pub const FAILED_PREVIEW: &str = "Failed to generate script";

const NO_SCRIPT: &str = "Generate a script first!";

/// Whether a completion was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result belonged to the latest request and was applied.
    Applied,
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

/// Inputs of one catalog fetch.
#[derive(Debug, Clone)]
pub struct CatalogTicket {
    /// Token to hand back on completion.
    pub token: RequestToken,
    /// Session the fetch runs under.
    pub session: SessionContext,
}

/// Inputs of one generation request.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    /// Token to hand back on completion.
    pub token: RequestToken,
    /// Session the request runs under.
    pub session: SessionContext,
    /// What to generate.
    pub request: GenerationRequest,
}

/// A local export, holding the script text as it was when export was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalExportJob {
    /// Script text including unsaved edits.
    pub content: String,
    /// Target format.
    pub format: ExportFormat,
}

/// A remote export, holding the script text as it was when export was triggered.
#[derive(Debug, Clone)]
pub struct RemoteExportJob {
    /// Session the export runs under.
    pub session: SessionContext,
    /// Body sent to the endpoint.
    pub request: RemoteExportRequest,
}

/// State machine of the test-script workflow.
#[derive(Debug)]
pub struct ScriptWorkflow {
    session: SessionContext,
    catalog: ApiCatalog,
    selected: Option<ApiId>,
    language: ScriptLanguage,
    framework: TestFramework,
    export_format: ExportFormat,
    script: Option<GeneratedScript>,
    generation_failed: bool,
    generating: Option<RequestToken>,
    exports_in_flight: usize,
    notice: Option<Notice>,
    catalog_seq: RequestSequencer,
    generation_seq: RequestSequencer,
    file_namer: ExportFileNamer,
}

impl ScriptWorkflow {
    /// Creates an idle workflow for the given session.
    #[must_use]
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            catalog: ApiCatalog::default(),
            selected: None,
            language: ScriptLanguage::default(),
            framework: TestFramework::default(),
            export_format: ExportFormat::default(),
            script: None,
            generation_failed: false,
            generating: None,
            exports_in_flight: 0,
            notice: None,
            catalog_seq: RequestSequencer::new(),
            generation_seq: RequestSequencer::new(),
            file_namer: ExportFileNamer::new(),
        }
    }

    /// Sets the initial language, framework, and export format.
    #[must_use]
    pub const fn with_defaults(
        mut self,
        language: ScriptLanguage,
        framework: TestFramework,
        export_format: ExportFormat,
    ) -> Self {
        self.language = language;
        self.framework = framework;
        self.export_format = export_format;
        self
    }

    // --- Queries ---

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> WorkflowPhase {
        if self.generating.is_some() {
            WorkflowPhase::Generating
        } else if self.script.is_some() {
            if self.exports_in_flight > 0 {
                WorkflowPhase::Exporting
            } else {
                WorkflowPhase::Ready
            }
        } else if self.selected.is_some() {
            WorkflowPhase::Selected
        } else {
            WorkflowPhase::Idle
        }
    }

    /// Session the workflow runs under.
    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Fetched catalog (empty after a failed fetch).
    #[must_use]
    pub const fn catalog(&self) -> &ApiCatalog {
        &self.catalog
    }

    /// Id of the selected API, if any.
    #[must_use]
    pub const fn selected_id(&self) -> Option<&ApiId> {
        self.selected.as_ref()
    }

    /// Selected API resolved through the catalog.
    #[must_use]
    pub fn selected_api(&self) -> Option<&ApiDefinition> {
        self.selected.as_ref().and_then(|id| self.catalog.get(id))
    }

    /// Target language for the next generation.
    #[must_use]
    pub const fn language(&self) -> ScriptLanguage {
        self.language
    }

    /// Target framework for the next generation.
    #[must_use]
    pub const fn framework(&self) -> TestFramework {
        self.framework
    }

    /// Format used by local exports when none is given.
    #[must_use]
    pub const fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    /// The live script, if one is installed.
    #[must_use]
    pub const fn script(&self) -> Option<&GeneratedScript> {
        self.script.as_ref()
    }

    /// Text to display in the preview pane.
    #[must_use]
    pub fn preview(&self) -> &str {
        match &self.script {
            Some(script) => script.content(),
            None if self.generation_failed => FAILED_PREVIEW,
            None => EMPTY_PREVIEW,
        }
    }

    /// The pending notice, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Removes and returns the pending notice.
    pub const fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    // --- Catalog ---

    /// Starts a catalog fetch, superseding any fetch still in flight.
    pub fn begin_catalog_load(&mut self) -> CatalogTicket {
        let token = self.catalog_seq.issue();
        tracing::debug!(%token, user = %self.session.user_id, "catalog fetch dispatched");
        CatalogTicket {
            token,
            session: self.session.clone(),
        }
    }

    /// Applies a catalog fetch outcome.
    ///
    /// A failed fetch leaves an empty catalog and no selection.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Network` after applying a current failure.
    pub fn complete_catalog_load(
        &mut self,
        token: RequestToken,
        result: Result<ApiCatalog, CatalogError>,
    ) -> WorkflowResult<Completion> {
        if !self.catalog_seq.is_current(token) {
            tracing::warn!(%token, "discarding stale catalog response");
            return Ok(Completion::Stale);
        }

        match result {
            Ok(catalog) => {
                tracing::info!(%token, count = catalog.len(), "catalog applied");
                self.catalog = catalog;
                if let Some(id) = &self.selected
                    && !self.catalog.contains(id)
                {
                    self.clear_selection();
                }
                Ok(Completion::Applied)
            }
            Err(error) => {
                tracing::warn!(%token, %error, "catalog unavailable, continuing with empty catalog");
                self.catalog = ApiCatalog::default();
                self.clear_selection();
                Err(self.fail(error.into()))
            }
        }
    }

    /// Switches to another session.
    ///
    /// When the user changes, the catalog, selection, and script are dropped
    /// and a new catalog fetch is started. A token-only change just updates
    /// the session.
    pub fn switch_session(&mut self, session: SessionContext) -> Option<CatalogTicket> {
        let user_changed = session.user_id != self.session.user_id;
        self.session = session;
        if !user_changed {
            return None;
        }

        self.catalog = ApiCatalog::default();
        self.clear_selection();
        Some(self.begin_catalog_load())
    }

    // --- Selection ---

    /// Selects an API from the catalog.
    ///
    /// Choosing a different API discards the current script and makes any
    /// in-flight generation stale. Re-selecting the current API is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if the id is not in the catalog.
    pub fn select_api(&mut self, id: &ApiId) -> WorkflowResult<()> {
        if !self.catalog.contains(id) {
            return Err(self.fail(WorkflowError::Validation(format!("Unknown API: {id}"))));
        }
        if self.selected.as_ref() == Some(id) {
            return Ok(());
        }

        self.clear_selection();
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Sets the target language.
    pub const fn set_language(&mut self, language: ScriptLanguage) {
        self.language = language;
    }

    /// Sets the target framework.
    pub const fn set_framework(&mut self, framework: TestFramework) {
        self.framework = framework;
    }

    /// Sets the default local export format.
    pub const fn set_export_format(&mut self, format: ExportFormat) {
        self.export_format = format;
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.script = None;
        self.generation_failed = false;
        if self.generating.take().is_some() {
            self.generation_seq.invalidate();
        }
    }

    // --- Generation ---

    /// Starts a generation request for the current selection.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` without touching the network if no
    /// API is selected.
    pub fn begin_generation(&mut self) -> WorkflowResult<GenerationTicket> {
        let Some(api_id) = self.selected.clone().filter(|id| !id.is_blank()) else {
            return Err(self.fail(GenerationError::SelectionRequired.into()));
        };

        let token = self.generation_seq.issue();
        self.generating = Some(token);
        self.notice = None;
        tracing::debug!(%token, api = %api_id, language = self.language.as_str(),
            framework = self.framework.as_str(), "generation dispatched");

        Ok(GenerationTicket {
            token,
            session: self.session.clone(),
            request: GenerationRequest::new(api_id, self.language, self.framework),
        })
    }

    /// Applies a generation outcome if `token` is still the latest request.
    ///
    /// Success installs the script, replacing the previous one. Failure drops
    /// the script, shows the failed placeholder, and returns to `Selected`.
    ///
    /// # Errors
    ///
    /// Returns the workflow error after applying a current failure.
    pub fn complete_generation(
        &mut self,
        token: RequestToken,
        result: Result<GeneratedScript, GenerationError>,
    ) -> WorkflowResult<Completion> {
        if self.generating != Some(token) || !self.generation_seq.is_current(token) {
            tracing::warn!(%token, "discarding stale generation response");
            return Ok(Completion::Stale);
        }
        self.generating = None;

        match result {
            Ok(script) => {
                tracing::info!(%token, bytes = script.content().len(), "script installed");
                self.script = Some(script);
                self.generation_failed = false;
                Ok(Completion::Applied)
            }
            Err(error) => {
                tracing::warn!(%token, %error, "generation failed");
                self.script = None;
                self.generation_failed = true;
                Err(self.fail(error.into()))
            }
        }
    }

    // --- Editing ---

    /// Replaces the script text with a user edit.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if no script is installed.
    pub fn edit_script(&mut self, content: impl Into<String>) -> WorkflowResult<()> {
        match self.script.as_mut() {
            Some(script) => {
                script.edit(content);
                Ok(())
            }
            None => Err(self.fail(WorkflowError::Validation(NO_SCRIPT.to_string()))),
        }
    }

    /// Appends a line to the current script text.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if no script is installed.
    pub fn append_script(&mut self, line: &str) -> WorkflowResult<()> {
        match self.script.as_mut() {
            Some(script) => {
                let content = format!("{}\n{line}", script.content());
                script.edit(content);
                Ok(())
            }
            None => Err(self.fail(WorkflowError::Validation(NO_SCRIPT.to_string()))),
        }
    }

    // --- Export ---

    /// Snapshots the current script for a local export.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if no script is installed.
    pub fn begin_local_export(&mut self, format: ExportFormat) -> WorkflowResult<LocalExportJob> {
        let Some(script) = &self.script else {
            return Err(self.fail(WorkflowError::Validation(NO_SCRIPT.to_string())));
        };
        let job = LocalExportJob {
            content: script.content().to_string(),
            format,
        };
        self.exports_in_flight += 1;
        Ok(job)
    }

    /// Records a local export outcome as a notice.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Encoding` for a failed download.
    pub fn complete_local_export(
        &mut self,
        result: Result<SavedDownload, DownloadError>,
    ) -> WorkflowResult<SavedDownload> {
        self.exports_in_flight = self.exports_in_flight.saturating_sub(1);
        match result {
            Ok(saved) => {
                self.notice = Some(Notice::info(NoticeKind::Exported, saved.message()));
                Ok(saved)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Snapshots the current script for a remote export under a fresh file name.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if no script is installed.
    pub fn begin_remote_export(&mut self, now_millis: i64) -> WorkflowResult<RemoteExportJob> {
        let Some(script) = &self.script else {
            return Err(self.fail(WorkflowError::Validation(NO_SCRIPT.to_string())));
        };
        let request = RemoteExportRequest {
            owner: self.session.user_id.clone(),
            file_name: self.file_namer.next_name(now_millis, script.language),
            script_content: script.content().to_string(),
        };
        self.exports_in_flight += 1;
        tracing::debug!(file = %request.file_name, "remote export dispatched");

        Ok(RemoteExportJob {
            session: self.session.clone(),
            request,
        })
    }

    /// Records a remote export outcome as a notice.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Network` carrying the server detail.
    pub fn complete_remote_export(
        &mut self,
        result: Result<ExportReceipt, RemoteExportError>,
    ) -> WorkflowResult<ExportReceipt> {
        self.exports_in_flight = self.exports_in_flight.saturating_sub(1);
        match result {
            Ok(receipt) => {
                self.notice = Some(Notice::info(NoticeKind::Exported, receipt.message.clone()));
                Ok(receipt)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    fn fail(&mut self, error: WorkflowError) -> WorkflowError {
        self.notice = Some(error.to_notice());
        error
    }
}

/// The collaborators the workflow calls, wrapped in their use cases.
pub struct WorkflowServices<C, G, R, S, K>
where
    C: ApiCatalogSource,
    G: ScriptGenerator,
    R: RemoteExporter,
    S: DownloadSink,
    K: Clock,
{
    /// Catalog accessor.
    pub list_apis: ListApis<C>,
    /// Generation requester.
    pub generate: GenerateScript<G, K>,
    /// Export encoder in download mode.
    pub download: ExportDownload<S>,
    /// Remote export dispatcher.
    pub remote: ExportToRemote<R>,
    /// Time source for export file names.
    pub clock: Arc<K>,
}

impl<C, G, R, S, K> WorkflowServices<C, G, R, S, K>
where
    C: ApiCatalogSource,
    G: ScriptGenerator,
    R: RemoteExporter,
    S: DownloadSink,
    K: Clock,
{
    /// Wires the use cases to their ports.
    pub fn new(catalog: Arc<C>, generator: Arc<G>, exporter: Arc<R>, sink: Arc<S>, clock: Arc<K>) -> Self {
        Self {
            list_apis: ListApis::new(catalog),
            generate: GenerateScript::new(generator, Arc::clone(&clock)),
            download: ExportDownload::new(sink),
            remote: ExportToRemote::new(exporter),
            clock,
        }
    }
}

impl<C, G, R, S, K> Clone for WorkflowServices<C, G, R, S, K>
where
    C: ApiCatalogSource,
    G: ScriptGenerator,
    R: RemoteExporter,
    S: DownloadSink,
    K: Clock,
{
    fn clone(&self) -> Self {
        Self {
            list_apis: self.list_apis.clone(),
            generate: self.generate.clone(),
            download: self.download.clone(),
            remote: self.remote.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

/// Sequential driver: each call awaits its collaborator before returning.
pub struct Orchestrator<C, G, R, S, K>
where
    C: ApiCatalogSource,
    G: ScriptGenerator,
    R: RemoteExporter,
    S: DownloadSink,
    K: Clock,
{
    workflow: ScriptWorkflow,
    services: WorkflowServices<C, G, R, S, K>,
}

impl<C, G, R, S, K> Orchestrator<C, G, R, S, K>
where
    C: ApiCatalogSource,
    G: ScriptGenerator,
    R: RemoteExporter,
    S: DownloadSink,
    K: Clock,
{
    /// Creates an orchestrator around a workflow.
    pub const fn new(workflow: ScriptWorkflow, services: WorkflowServices<C, G, R, S, K>) -> Self {
        Self { workflow, services }
    }

    /// Read access to the state.
    pub const fn workflow(&self) -> &ScriptWorkflow {
        &self.workflow
    }

    /// Write access to the state for synchronous transitions.
    pub const fn workflow_mut(&mut self) -> &mut ScriptWorkflow {
        &mut self.workflow
    }

    /// Fetches the catalog for the current session.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Network` if the catalog is unavailable; the
    /// workflow continues with an empty catalog.
    pub async fn load_catalog(&mut self) -> WorkflowResult<Completion> {
        let ticket = self.workflow.begin_catalog_load();
        let result = self.services.list_apis.execute(&ticket.session).await;
        self.workflow.complete_catalog_load(ticket.token, result)
    }

    /// Switches session and reloads the catalog if the user changed.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Network` if the new catalog is unavailable.
    pub async fn switch_session(&mut self, session: SessionContext) -> WorkflowResult<Completion> {
        match self.workflow.switch_session(session) {
            Some(ticket) => {
                let result = self.services.list_apis.execute(&ticket.session).await;
                self.workflow.complete_catalog_load(ticket.token, result)
            }
            None => Ok(Completion::Applied),
        }
    }

    /// Selects an API.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for an id outside the catalog.
    pub fn select_api(&mut self, id: &ApiId) -> WorkflowResult<()> {
        self.workflow.select_api(id)
    }

    /// Generates a script for the current selection.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` with no network call when nothing
    /// is selected, and `WorkflowError::Network` when generation fails.
    pub async fn generate(&mut self) -> WorkflowResult<Completion> {
        let ticket = self.workflow.begin_generation()?;
        let result = self
            .services
            .generate
            .execute(&ticket.session, &ticket.request)
            .await;
        self.workflow.complete_generation(ticket.token, result)
    }

    /// Replaces the script text with a user edit.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if no script is installed.
    pub fn edit_script(&mut self, content: impl Into<String>) -> WorkflowResult<()> {
        self.workflow.edit_script(content)
    }

    /// Exports the current script, edits included, as a local download.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` without a script and
    /// `WorkflowError::Encoding` if the download fails.
    pub async fn export_local(&mut self, format: ExportFormat) -> WorkflowResult<SavedDownload> {
        let job = self.workflow.begin_local_export(format)?;
        let result = self.services.download.execute(&job.content, job.format).await;
        self.workflow.complete_local_export(result)
    }

    /// Pushes the current script, edits included, to the remote endpoint.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` without a script and
    /// `WorkflowError::Network` with the server detail on rejection.
    pub async fn export_remote(&mut self) -> WorkflowResult<ExportReceipt> {
        let job = self
            .workflow
            .begin_remote_export(self.services.clock.epoch_millis())?;
        let result = self.services.remote.execute(&job.session, &job.request).await;
        self.workflow.complete_remote_export(result)
    }

    /// Consumes the orchestrator, returning the final state.
    pub fn into_workflow(self) -> ScriptWorkflow {
        self.workflow
    }
}
