//! Output formatting for CLI commands

use lazytodo_core::{sort_todos, status_class, ListSummary, TodoList};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({
                    "success": true,
                    "message": message
                })
            ),
        }
    }

    /// Prints a success message for a newly created record
    pub fn created(&self, message: &str, id: i64) {
        match self.format {
            OutputFormat::Text => println!("{} (id {})", message, id),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({
                    "success": true,
                    "message": message,
                    "id": id
                })
            ),
        }
    }

    /// Prints the list index, one row per list
    pub fn summaries(&self, summaries: &[ListSummary]) {
        match self.format {
            OutputFormat::Text => {
                if summaries.is_empty() {
                    println!("No lists yet.");
                }
                for summary in summaries {
                    println!(
                        "{} {:>4}  {}  ({}/{})",
                        checkbox(summary.complete),
                        summary.id,
                        summary.name,
                        summary.undone,
                        summary.total
                    );
                }
            }
            OutputFormat::Json => self.json(summaries),
        }
    }

    /// Prints one list with its todos, incomplete first
    pub fn list(&self, list: &TodoList) {
        match self.format {
            OutputFormat::Text => {
                println!("{} (id {})", list.name, list.id);
                for todo in sort_todos(list) {
                    println!("  {} {:>4}  {}", checkbox(todo.completed), todo.id, todo.name);
                }
            }
            OutputFormat::Json => self.json(list),
        }
    }

    fn json<T: Serialize + ?Sized>(&self, data: &T) {
        match serde_json::to_string_pretty(data) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing output: {}", e),
        }
    }
}

fn checkbox(done: bool) -> &'static str {
    match status_class(done) {
        Some(_) => "[x]",
        None => "[ ]",
    }
}
