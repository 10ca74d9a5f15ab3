//! One-shot subcommands: `apis` and `generate`.

use anyhow::{Context, bail};
use scriptgen_application::{Orchestrator, ScriptWorkflow};
use scriptgen_domain::{ApiId, ExportFormat, ScriptLanguage, TestFramework};
use scriptgen_infrastructure::to_json_stable;

use crate::{AppOrchestrator, AppServices};

/// Options of the `generate` subcommand.
pub struct GenerateOptions {
    pub api: String,
    pub language: Option<ScriptLanguage>,
    pub framework: Option<TestFramework>,
    pub export: Option<ExportFormat>,
    pub push: bool,
}

async fn loaded(workflow: ScriptWorkflow, services: AppServices) -> anyhow::Result<AppOrchestrator> {
    let mut orchestrator = Orchestrator::new(workflow, services);
    orchestrator.load_catalog().await?;
    Ok(orchestrator)
}

/// Prints the user's catalog.
pub async fn list_apis(
    workflow: ScriptWorkflow,
    services: AppServices,
    json: bool,
) -> anyhow::Result<()> {
    let orchestrator = loaded(workflow, services).await?;
    let catalog = orchestrator.workflow().catalog();

    if json {
        print!("{}", to_json_stable(&catalog.entries()).context("Failed to encode catalog")?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("No APIs registered.");
    }
    for api in catalog.iter() {
        println!(
            "{:<26} {:<7} {:<28} {}",
            api.id.as_str(),
            api.method.as_str(),
            api.name,
            api.url
        );
    }
    Ok(())
}

/// Generates a script, prints it, and optionally exports it.
pub async fn generate(
    mut workflow: ScriptWorkflow,
    services: AppServices,
    options: GenerateOptions,
) -> anyhow::Result<()> {
    if let Some(language) = options.language {
        workflow.set_language(language);
    }
    if let Some(framework) = options.framework {
        workflow.set_framework(framework);
    }

    let mut orchestrator = loaded(workflow, services).await?;
    orchestrator.select_api(&ApiId::new(options.api.trim()))?;
    orchestrator.generate().await?;

    println!("{}", orchestrator.workflow().preview());

    let mut failures = 0;
    if let Some(format) = options.export {
        match orchestrator.export_local(format).await {
            Ok(saved) => eprintln!("{} ({})", saved.message(), saved.path.display()),
            Err(error) => {
                eprintln!("error: {error}");
                failures += 1;
            }
        }
    }
    if options.push {
        match orchestrator.export_remote().await {
            Ok(receipt) => eprintln!("{}", receipt.message),
            Err(error) => {
                eprintln!("error: {error}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} export(s) failed");
    }
    Ok(())
}
