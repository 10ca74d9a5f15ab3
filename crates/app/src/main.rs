//! Scriptgen - Main Entry Point
//!
//! Loads settings, wires the backend adapters into the workflow, and runs
//! either a one-shot subcommand or the interactive session.

mod cli;
mod interactive;
mod oneshot;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use scriptgen_application::{Orchestrator, ScriptWorkflow, WorkflowServices};
use scriptgen_domain::{ClientSettings, SessionContext};
use scriptgen_infrastructure::{FileDownloadSink, RestBackend, SettingsRepository, SystemClock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::oneshot::GenerateOptions;

/// Services wired to the production adapters.
pub type AppServices =
    WorkflowServices<RestBackend, RestBackend, RestBackend, FileDownloadSink, SystemClock>;

/// Sequential driver over the production adapters.
pub type AppOrchestrator =
    Orchestrator<RestBackend, RestBackend, RestBackend, FileDownloadSink, SystemClock>;

fn services(settings: &ClientSettings) -> anyhow::Result<AppServices> {
    let backend =
        Arc::new(RestBackend::new(settings.clone()).context("Failed to configure backend client")?);
    let download_dir = settings
        .download_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(WorkflowServices::new(
        Arc::clone(&backend),
        Arc::clone(&backend),
        backend,
        Arc::new(FileDownloadSink::new(download_dir)),
        Arc::new(SystemClock::new()),
    ))
}

fn workflow(settings: &ClientSettings, session: SessionContext) -> ScriptWorkflow {
    ScriptWorkflow::new(session).with_defaults(
        settings.default_language,
        settings.default_framework,
        settings.default_export_format,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries scripts and catalog output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let repository = cli
        .config
        .clone()
        .map_or_else(SettingsRepository::new, |path| SettingsRepository::at(path));
    let mut settings = repository
        .load_with_env()
        .await
        .context("Failed to load settings")?;
    cli.apply_overrides(&mut settings);

    let session = cli.session();
    if session.user_id.is_empty() {
        tracing::warn!("no user id given; pass --user or set SCRIPTGEN_USER_ID");
    }
    tracing::debug!(base_url = %settings.base_url, ?session, "starting");

    let services = services(&settings)?;
    let workflow = workflow(&settings, session);

    match cli.command {
        Some(Commands::Apis { json }) => oneshot::list_apis(workflow, services, json).await,
        Some(Commands::Generate {
            api,
            language,
            framework,
            export,
            push,
        }) => {
            let options = GenerateOptions {
                api,
                language,
                framework,
                export,
                push,
            };
            oneshot::generate(workflow, services, options).await
        }
        Some(Commands::Interactive) | None => {
            interactive::run(workflow, services, settings.default_export_format).await
        }
    }
}
