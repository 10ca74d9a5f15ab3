//! Command-line arguments.

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scriptgen_domain::{ClientSettings, ExportFormat, ScriptLanguage, SessionContext, TestFramework};

/// Generate, edit, and export API test scripts.
#[derive(Parser, Debug)]
#[command(name = "scriptgen", version, about, long_about = None)]
pub struct Cli {
    /// Id of the signed-in user
    #[arg(long = "user", env = "SCRIPTGEN_USER_ID", global = true, default_value = "")]
    pub user_id: String,

    /// Bearer token for the backend
    #[arg(long, env = "SCRIPTGEN_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Directory local exports are written to
    #[arg(long, global = true)]
    pub download_dir: Option<PathBuf>,

    /// Subcommand; starts an interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the APIs registered for the user
    Apis {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a script for one API and print it
    Generate {
        /// Id of the API to generate for
        #[arg(long)]
        api: String,
        /// Target language (javascript, python, java)
        #[arg(long)]
        language: Option<ScriptLanguage>,
        /// Target framework (postman, junit, cypress)
        #[arg(long)]
        framework: Option<TestFramework>,
        /// Also save the script locally (html, pdf, json, txt)
        #[arg(long, value_parser = parse_export_format)]
        export: Option<ExportFormat>,
        /// Also push the script to the remote export endpoint
        #[arg(long)]
        push: bool,
    },

    /// Start an interactive session (the default)
    Interactive,
}

/// Unrecognized formats fall back to plain text.
pub fn parse_export_format(value: &str) -> Result<ExportFormat, Infallible> {
    Ok(ExportFormat::parse_lenient(value))
}

impl Cli {
    /// Applies flag overrides on top of file and environment settings.
    pub fn apply_overrides(&self, settings: &mut ClientSettings) {
        if let Some(base_url) = &self.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if let Some(dir) = &self.download_dir {
            settings.download_dir = Some(dir.clone());
        }
    }

    /// Session built from `--user` and `--token`.
    pub fn session(&self) -> SessionContext {
        let session = SessionContext::new(self.user_id.trim());
        match &self.token {
            Some(token) => session.with_token(token.trim()),
            None => session,
        }
    }
}
