//! Core domain logic for LazyTodo.
//! This crate is the single source of truth for list/todo invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{AppConfig, Backend, ConfigError};
pub use db::DbLocation;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::progress::{
    is_list_complete, partition_order, sort_lists, sort_todos, status_class, summarize,
    total_count, undone_count, ListSummary,
};
pub use model::todo_list::{ListId, Todo, TodoId, TodoList};
pub use model::validation::{
    validate_list_name, validate_todo_text, ValidationError, ValidationErrorKind,
    ValidationSubject,
};
pub use service::todo_service::{ServiceResult, TodoService, TodoServiceError};
pub use store::session_store::{SessionState, SessionTodoStore};
pub use store::sqlite_store::SqliteTodoStore;
pub use store::{StoreError, StoreResult, TodoStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
