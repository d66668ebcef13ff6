//! Command definitions and store composition

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lazytodo_core::config::{BACKEND_VAR, DATABASE_URL_VAR, SESSION_FILE_VAR};
use lazytodo_core::{
    init_logging, AppConfig, Backend, ListId, SessionState, SessionTodoStore, SqliteTodoStore,
    TodoId, TodoService, TodoStore,
};
use log::info;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "lazytodo")]
#[command(author, version, about = "Track todos across named lists")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Store backend (session|sqlite); overrides LAZYTODO_BACKEND
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// SQLite connection descriptor; overrides DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Session file for the session backend; overrides LAZYTODO_SESSION_FILE
    #[arg(long, global = true)]
    pub session_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show all lists, unfinished ones first
    Lists,

    /// Show one list and its todos
    Show { list_id: ListId },

    /// Create a new list
    NewList { name: String },

    /// Rename a list
    RenameList { list_id: ListId, name: String },

    /// Delete a list and all its todos
    DeleteList { list_id: ListId },

    /// Add a todo to a list
    Add { list_id: ListId, text: String },

    /// Mark a todo as done
    Done { list_id: ListId, todo_id: TodoId },

    /// Mark a todo as not done
    Undo { list_id: ListId, todo_id: TodoId },

    /// Delete a todo
    DeleteTodo { list_id: ListId, todo_id: TodoId },

    /// Mark every todo in a list as done
    CompleteAll { list_id: ListId },
}

/// Parses arguments and runs one command against the configured store
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("Failed to initialize logging")?;
    }

    let output = Output::new(cli.format);
    match &config.backend {
        Backend::Sqlite { location } => {
            let store = SqliteTodoStore::open(location)
                .with_context(|| format!("Failed to open database `{}`", location))?;
            let mut service = TodoService::new(store);
            execute(&cli.command, &mut service, &output)?;
            service
                .into_store()
                .close()
                .context("Failed to close database")?;
        }
        Backend::Session { path } => {
            let mut session = load_session(path)?;
            execute(
                &cli.command,
                &mut TodoService::new(SessionTodoStore::new(&mut session)),
                &output,
            )?;
            save_session(path, &session)?;
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::from_lookup(|key| {
        let flag = match key {
            BACKEND_VAR => cli.backend.clone(),
            DATABASE_URL_VAR => cli.database_url.clone(),
            SESSION_FILE_VAR => cli.session_file.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
    .context("Invalid configuration")
}

fn execute<S: TodoStore>(
    command: &Commands,
    service: &mut TodoService<S>,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::Lists => output.summaries(&service.list_summaries()?),
        Commands::Show { list_id } => output.list(&service.load_list(*list_id)?),
        Commands::NewList { name } => {
            let id = service.create_list(name)?;
            output.created("The list has been created.", id);
        }
        Commands::RenameList { list_id, name } => {
            service.rename_list(*list_id, name)?;
            output.success("The change has been saved.");
        }
        Commands::DeleteList { list_id } => {
            service.delete_list(*list_id)?;
            output.success("The list has been deleted.");
        }
        Commands::Add { list_id, text } => {
            let id = service.add_todo(*list_id, text)?;
            output.created("The todo has been added.", id);
        }
        Commands::Done { list_id, todo_id } => {
            service.set_todo_completed(*list_id, *todo_id, true)?;
            output.success("The todo has been updated.");
        }
        Commands::Undo { list_id, todo_id } => {
            service.set_todo_completed(*list_id, *todo_id, false)?;
            output.success("The todo has been updated.");
        }
        Commands::DeleteTodo { list_id, todo_id } => {
            service.delete_todo(*list_id, *todo_id)?;
            output.success("The todo has been deleted.");
        }
        Commands::CompleteAll { list_id } => {
            service.complete_all_todos(*list_id)?;
            output.success("All todos are completed.");
        }
    }
    Ok(())
}

fn load_session(path: &Path) -> Result<SessionState> {
    match fs::read_to_string(path) {
        Ok(payload) => SessionState::from_json(&payload)
            .with_context(|| format!("Failed to parse session file `{}`", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(SessionState::new()),
        Err(e) => Err(e)
            .with_context(|| format!("Failed to read session file `{}`", path.display())),
    }
}

fn save_session(path: &Path, session: &SessionState) -> Result<()> {
    let payload = session.to_json().context("Failed to serialize session")?;

    // Replace by rename so an interrupted save never truncates the old file.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to stage session file in `{}`", dir.display()))?;
    staged
        .write_all(payload.as_bytes())
        .with_context(|| format!("Failed to stage session file in `{}`", dir.display()))?;
    staged
        .as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush session file in `{}`", dir.display()))?;
    staged
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("Failed to write session file `{}`", path.display()))?;
    info!(
        "event=session_save module=cli status=ok lists={}",
        session.lists().len()
    );
    Ok(())
}
