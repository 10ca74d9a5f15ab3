//! Channel-driven workflow runner.
//!
//! Defines the protocol between a front end (the interactive CLI) and the
//! async runtime. The front end sends `WorkflowCommand`s; the runner applies
//! them to a `ScriptWorkflow`, spawns the network calls, and reports every
//! change back as `WorkflowUpdate`s. Responses re-enter the state machine on
//! the runner task only, so a late response can never overwrite a newer one.

use scriptgen_domain::{
    ApiCatalog, ApiDefinition, ApiId, ExportFormat, ExportReceipt, GeneratedScript, Notice,
    ScriptLanguage, SessionContext, TestFramework, WorkflowPhase,
};
use tokio::sync::mpsc;

use crate::ports::{
    ApiCatalogSource, CatalogError, Clock, DownloadError, DownloadSink, GenerationError,
    RemoteExportError, RemoteExporter, ScriptGenerator,
};
use crate::sequencer::RequestToken;
use crate::use_cases::SavedDownload;
use crate::workflow::{
    CatalogTicket, Completion, GenerationTicket, LocalExportJob, RemoteExportJob, ScriptWorkflow,
    WorkflowServices,
};

/// Commands sent from the front end to the runner.
#[derive(Debug, Clone)]
pub enum WorkflowCommand {
    /// Refetch the catalog for the current session.
    Reload,

    /// The signed-in user or token changed.
    SwitchSession(SessionContext),

    /// User picked an API from the catalog.
    SelectApi(ApiId),

    /// User picked a target language.
    SetLanguage(ScriptLanguage),

    /// User picked a target framework.
    SetFramework(TestFramework),

    /// User asked for a script.
    Generate,

    /// User replaced the script text.
    EditScript(String),

    /// User appended a line to the script.
    AppendScript(String),

    /// User asked for a local download.
    ExportLocal(ExportFormat),

    /// User asked for a remote export.
    ExportRemote,

    /// Stop accepting commands; outstanding calls are still drained.
    Shutdown,
}

/// Updates sent from the runner to the front end.
#[derive(Debug, Clone)]
pub enum WorkflowUpdate {
    /// The catalog was (re)loaded; empty after a failure.
    Catalog(Vec<ApiDefinition>),

    /// The workflow state changed.
    State(WorkflowSnapshot),

    /// Show a confirmation or error.
    Notice(Notice),
}

/// What the front end needs to render the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    /// Current phase.
    pub phase: WorkflowPhase,
    /// Selected API, resolved through the catalog.
    pub selected: Option<ApiDefinition>,
    /// Target language.
    pub language: ScriptLanguage,
    /// Target framework.
    pub framework: TestFramework,
    /// Preview pane text.
    pub preview: String,
    /// Whether the script carries hand edits.
    pub edited: bool,
}

impl WorkflowSnapshot {
    /// Captures the render state of a workflow.
    #[must_use]
    pub fn capture(workflow: &ScriptWorkflow) -> Self {
        Self {
            phase: workflow.phase(),
            selected: workflow.selected_api().cloned(),
            language: workflow.language(),
            framework: workflow.framework(),
            preview: workflow.preview().to_string(),
            edited: workflow.script().is_some_and(GeneratedScript::is_edited),
        }
    }
}

enum Completed {
    Catalog(RequestToken, Result<ApiCatalog, CatalogError>),
    Generation(RequestToken, Result<GeneratedScript, GenerationError>),
    LocalExport(Result<SavedDownload, DownloadError>),
    RemoteExport(Result<ExportReceipt, RemoteExportError>),
}

/// Owns a workflow and drives it from a command channel.
pub struct WorkflowRunner<C, G, R, S, K>
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

impl<C, G, R, S, K> WorkflowRunner<C, G, R, S, K>
where
    C: ApiCatalogSource + 'static,
    G: ScriptGenerator + 'static,
    R: RemoteExporter + 'static,
    S: DownloadSink + 'static,
    K: Clock + 'static,
{
    /// Creates a runner around a workflow.
    pub const fn new(workflow: ScriptWorkflow, services: WorkflowServices<C, G, R, S, K>) -> Self {
        Self { workflow, services }
    }

    /// Loads the catalog, then processes commands until `Shutdown` or until
    /// the command channel closes. Returns the final state once every
    /// outstanding call has completed.
    pub async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<WorkflowCommand>,
        update_tx: mpsc::UnboundedSender<WorkflowUpdate>,
    ) -> ScriptWorkflow {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completed>();
        let mut pending = 0usize;
        let mut accepting = true;

        let ticket = self.workflow.begin_catalog_load();
        self.spawn_catalog(ticket, &done_tx);
        pending += 1;
        self.publish(&update_tx);

        loop {
            tokio::select! {
                cmd = cmd_rx.recv(), if accepting => match cmd {
                    Some(WorkflowCommand::Shutdown) | None => {
                        tracing::debug!(pending, "runner shutting down");
                        accepting = false;
                    }
                    Some(cmd) => {
                        pending += self.handle(cmd, &done_tx);
                        self.publish(&update_tx);
                    }
                },
                Some(done) = done_rx.recv(), if pending > 0 => {
                    pending -= 1;
                    self.apply(done, &update_tx);
                    self.publish(&update_tx);
                },
                else => break,
            }
        }

        self.workflow
    }

    /// Applies one command; returns how many calls it dispatched.
    fn handle(&mut self, cmd: WorkflowCommand, done_tx: &mpsc::UnboundedSender<Completed>) -> usize {
        match cmd {
            WorkflowCommand::Reload => {
                let ticket = self.workflow.begin_catalog_load();
                self.spawn_catalog(ticket, done_tx);
                1
            }
            WorkflowCommand::SwitchSession(session) => {
                match self.workflow.switch_session(session) {
                    Some(ticket) => {
                        self.spawn_catalog(ticket, done_tx);
                        1
                    }
                    None => 0,
                }
            }
            WorkflowCommand::SelectApi(id) => {
                let _ = self.workflow.select_api(&id);
                0
            }
            WorkflowCommand::SetLanguage(language) => {
                self.workflow.set_language(language);
                0
            }
            WorkflowCommand::SetFramework(framework) => {
                self.workflow.set_framework(framework);
                0
            }
            WorkflowCommand::Generate => match self.workflow.begin_generation() {
                Ok(ticket) => {
                    self.spawn_generation(ticket, done_tx);
                    1
                }
                Err(_) => 0,
            },
            WorkflowCommand::EditScript(content) => {
                let _ = self.workflow.edit_script(content);
                0
            }
            WorkflowCommand::AppendScript(line) => {
                let _ = self.workflow.append_script(&line);
                0
            }
            WorkflowCommand::ExportLocal(format) => match self.workflow.begin_local_export(format) {
                Ok(job) => {
                    self.spawn_local_export(job, done_tx);
                    1
                }
                Err(_) => 0,
            },
            WorkflowCommand::ExportRemote => {
                let now = self.services.clock.epoch_millis();
                match self.workflow.begin_remote_export(now) {
                    Ok(job) => {
                        self.spawn_remote_export(job, done_tx);
                        1
                    }
                    Err(_) => 0,
                }
            }
            WorkflowCommand::Shutdown => 0,
        }
    }

    fn apply(&mut self, done: Completed, update_tx: &mpsc::UnboundedSender<WorkflowUpdate>) {
        match done {
            Completed::Catalog(token, result) => {
                if let Ok(Completion::Stale) = self.workflow.complete_catalog_load(token, result) {
                    return;
                }
                let entries = self.workflow.catalog().entries().to_vec();
                let _ = update_tx.send(WorkflowUpdate::Catalog(entries));
            }
            Completed::Generation(token, result) => {
                let _ = self.workflow.complete_generation(token, result);
            }
            Completed::LocalExport(result) => {
                let _ = self.workflow.complete_local_export(result);
            }
            Completed::RemoteExport(result) => {
                let _ = self.workflow.complete_remote_export(result);
            }
        }
    }

    fn publish(&mut self, update_tx: &mpsc::UnboundedSender<WorkflowUpdate>) {
        let _ = update_tx.send(WorkflowUpdate::State(WorkflowSnapshot::capture(&self.workflow)));
        if let Some(notice) = self.workflow.take_notice() {
            let _ = update_tx.send(WorkflowUpdate::Notice(notice));
        }
    }

    fn spawn_catalog(&self, ticket: CatalogTicket, done_tx: &mpsc::UnboundedSender<Completed>) {
        let list_apis = self.services.list_apis.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = list_apis.execute(&ticket.session).await;
            let _ = done_tx.send(Completed::Catalog(ticket.token, result));
        });
    }

    fn spawn_generation(&self, ticket: GenerationTicket, done_tx: &mpsc::UnboundedSender<Completed>) {
        let generate = self.services.generate.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = generate.execute(&ticket.session, &ticket.request).await;
            let _ = done_tx.send(Completed::Generation(ticket.token, result));
        });
    }

    fn spawn_local_export(&self, job: LocalExportJob, done_tx: &mpsc::UnboundedSender<Completed>) {
        let download = self.services.download.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = download.execute(&job.content, job.format).await;
            let _ = done_tx.send(Completed::LocalExport(result));
        });
    }

    fn spawn_remote_export(&self, job: RemoteExportJob, done_tx: &mpsc::UnboundedSender<Completed>) {
        let remote = self.services.remote.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = remote.execute(&job.session, &job.request).await;
            let _ = done_tx.send(Completed::RemoteExport(result));
        });
    }
}
