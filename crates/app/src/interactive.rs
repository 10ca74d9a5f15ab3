//! Interactive session.
//!
//! Reads commands from stdin, forwards them to a `WorkflowRunner` running on
//! its own task, and renders the updates it sends back. The session keeps a
//! copy of the last catalog and snapshot so `list`, `show`, and `status`
//! answer without a round trip.

use std::path::PathBuf;

use anyhow::Context;
use scriptgen_application::{
    ScriptWorkflow, WorkflowCommand, WorkflowRunner, WorkflowSnapshot, WorkflowUpdate,
};
use scriptgen_domain::{
    ApiDefinition, ApiId, DomainError, ExportFormat, NoticeLevel, ScriptLanguage, SessionContext,
    TestFramework, WorkflowPhase,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::AppServices;

const HELP: &str = "\
Commands:
  list                    show the API catalog
  reload                  fetch the catalog again
  select <n|id>           select an API by list number or id
  language <lang>         javascript | python | java
  framework <fw>          postman | junit | cypress
  generate                generate a script for the selected API
  show                    print the current script
  edit <file>             replace the script with the contents of a file
  append <text>           add a line to the end of the script
  export [format]         save locally as html | pdf | json | txt
  push                    export to the remote repository
  user <id> [token]       switch the signed-in user
  status                  show the current selection and phase
  help                    show this list
  quit                    leave the session";

/// One parsed line of user input.
#[derive(Debug)]
pub enum Input {
    /// Forward as-is to the runner.
    Send(WorkflowCommand),
    /// Select by list number or id.
    Select(String),
    /// Replace the script with a file's contents.
    EditFrom(PathBuf),
    /// Export locally; `None` uses the configured default format.
    Export(Option<ExportFormat>),
    List,
    Show,
    Status,
    Help,
    Quit,
    Empty,
}

/// Parses one line of input.
pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(command, rest)| (command, rest.trim()));

    let required = |what: &str| {
        if rest.is_empty() {
            Err(format!("Usage: {command} <{what}>"))
        } else {
            Ok(rest.to_string())
        }
    };

    let input = match command.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "list" | "ls" => Input::List,
        "reload" => Input::Send(WorkflowCommand::Reload),
        "select" => Input::Select(required("n|id")?),
        "language" | "lang" => {
            let language: ScriptLanguage = required("lang")?
                .parse()
                .map_err(|e: DomainError| e.to_string())?;
            Input::Send(WorkflowCommand::SetLanguage(language))
        }
        "framework" | "fw" => {
            let framework: TestFramework = required("fw")?
                .parse()
                .map_err(|e: DomainError| e.to_string())?;
            Input::Send(WorkflowCommand::SetFramework(framework))
        }
        "generate" | "gen" => Input::Send(WorkflowCommand::Generate),
        "show" => Input::Show,
        "edit" => Input::EditFrom(PathBuf::from(required("file")?)),
        "append" => Input::Send(WorkflowCommand::AppendScript(required("text")?)),
        "export" => Input::Export((!rest.is_empty()).then(|| ExportFormat::parse_lenient(rest))),
        "push" => Input::Send(WorkflowCommand::ExportRemote),
        "user" => {
            let args = required("id")?;
            let mut parts = args.split_whitespace();
            let session = SessionContext::new(parts.next().unwrap_or_default());
            let session = match parts.next() {
                Some(token) => session.with_token(token),
                None => session,
            };
            Input::Send(WorkflowCommand::SwitchSession(session))
        }
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("Unknown command `{other}`. Type `help` for a list.")),
    };
    Ok(input)
}

enum Flow {
    Continue,
    Quit,
}

/// Local view of the runner's state.
struct View {
    catalog: Vec<ApiDefinition>,
    snapshot: Option<WorkflowSnapshot>,
    default_format: ExportFormat,
}

impl View {
    const fn new(default_format: ExportFormat) -> Self {
        Self {
            catalog: Vec::new(),
            snapshot: None,
            default_format,
        }
    }

    /// Resolves a 1-based list number or a literal id.
    fn resolve(&self, target: &str) -> ApiId {
        target
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| self.catalog.get(index))
            .map_or_else(|| ApiId::new(target), |api| api.id.clone())
    }

    fn phase(&self) -> WorkflowPhase {
        self.snapshot.as_ref().map(|s| s.phase).unwrap_or_default()
    }

    async fn handle_line(
        &self,
        line: &str,
        cmd_tx: &mpsc::UnboundedSender<WorkflowCommand>,
    ) -> Flow {
        let input = match parse_line(line) {
            Ok(input) => input,
            Err(message) => {
                eprintln!("{message}");
                return Flow::Continue;
            }
        };

        let command = match input {
            Input::Send(command) => command,
            Input::Select(target) => WorkflowCommand::SelectApi(self.resolve(&target)),
            Input::EditFrom(path) => match tokio::fs::read_to_string(&path).await {
                Ok(content) => WorkflowCommand::EditScript(content),
                Err(error) => {
                    eprintln!("error: could not read {}: {error}", path.display());
                    return Flow::Continue;
                }
            },
            Input::Export(format) => {
                WorkflowCommand::ExportLocal(format.unwrap_or(self.default_format))
            }
            Input::List => {
                self.print_catalog();
                return Flow::Continue;
            }
            Input::Show => {
                if let Some(snapshot) = &self.snapshot {
                    println!("{}", snapshot.preview);
                }
                return Flow::Continue;
            }
            Input::Status => {
                self.print_status();
                return Flow::Continue;
            }
            Input::Help => {
                println!("{HELP}");
                return Flow::Continue;
            }
            Input::Quit => return Flow::Quit,
            Input::Empty => return Flow::Continue,
        };

        if cmd_tx.send(command).is_err() {
            return Flow::Quit;
        }
        Flow::Continue
    }

    fn render(&mut self, update: WorkflowUpdate) {
        match update {
            WorkflowUpdate::Catalog(entries) => {
                println!("Loaded {} API(s). Type `list` to show them.", entries.len());
                self.catalog = entries;
            }
            WorkflowUpdate::State(snapshot) => {
                let previous = self.phase();
                if snapshot.phase != previous {
                    println!("[{}]", snapshot.phase.label());
                    if previous == WorkflowPhase::Generating && snapshot.phase == WorkflowPhase::Ready
                    {
                        println!("{}", snapshot.preview);
                    }
                }
                self.snapshot = Some(snapshot);
            }
            WorkflowUpdate::Notice(notice) => match notice.level {
                NoticeLevel::Info => println!("{}", notice.message),
                NoticeLevel::Error => eprintln!("error: {}", notice.message),
            },
        }
    }

    fn print_catalog(&self) {
        if self.catalog.is_empty() {
            println!("No APIs available.");
            return;
        }
        let selected = self.snapshot.as_ref().and_then(|s| s.selected.as_ref());
        for (index, api) in self.catalog.iter().enumerate() {
            let marker = if selected.is_some_and(|s| s.id == api.id) { "*" } else { " " };
            println!("{marker}{:>3}. {} [{}]", index + 1, api.summary(), api.id);
        }
    }

    fn print_status(&self) {
        let Some(snapshot) = &self.snapshot else {
            println!("Starting up...");
            return;
        };
        println!("phase:     {}", snapshot.phase.label());
        match &snapshot.selected {
            Some(api) => println!("api:       {}", api.summary()),
            None => println!("api:       (none)"),
        }
        println!("language:  {}", snapshot.language.display_name());
        println!("framework: {}", snapshot.framework.display_name());
        println!("edited:    {}", if snapshot.edited { "yes" } else { "no" });
    }
}

/// Runs the interactive session until `quit` or end of input.
pub async fn run(
    workflow: ScriptWorkflow,
    services: AppServices,
    default_format: ExportFormat,
) -> anyhow::Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<WorkflowCommand>();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel::<WorkflowUpdate>();
    let runner = tokio::spawn(WorkflowRunner::new(workflow, services).run(cmd_rx, update_tx));

    println!("Type `help` for a list of commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut view = View::new(default_format);
    let mut reading = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => {
                let flow = match line.context("Failed to read input")? {
                    Some(line) => view.handle_line(&line, &cmd_tx).await,
                    None => Flow::Quit,
                };
                if let Flow::Quit = flow {
                    let _ = cmd_tx.send(WorkflowCommand::Shutdown);
                    reading = false;
                }
            }
            update = update_rx.recv() => match update {
                Some(update) => view.render(update),
                None => break,
            },
        }
    }

    let workflow = runner.await.context("Workflow runner stopped unexpectedly")?;
    tracing::debug!(phase = workflow.phase().label(), "session ended");
    Ok(())
}
