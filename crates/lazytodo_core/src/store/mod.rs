//! Store contract and backend implementations.
//!
//! # Responsibility
//! - Define the one capability set every backend provides over lists/todos.
//! - Keep session and SQLite details behind that contract.
//!
//! # Invariants
//! - Both backends report a missing list or todo as `ListNotFound` /
//!   `TodoNotFound` and leave state untouched when they do.
//! - Every mutation is visible to the next read on the same store.
//! - Ids are never recycled after deletion; an exhausted id space is an
//!   error, never a wrap-around.

use crate::db::DbError;
use crate::model::todo_list::{ListId, TodoId, TodoList};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod session_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store backends.
#[derive(Debug)]
pub enum StoreError {
    /// No list with this id exists.
    ListNotFound(ListId),
    /// The list exists but holds no todo with this id.
    TodoNotFound { list_id: ListId, todo_id: TodoId },
    /// Persistence medium failed or is unreachable.
    Unavailable(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// The next id would overflow `i64`. `list_id` is `None` for list ids.
    IdSpaceExhausted { list_id: Option<ListId> },
}

impl StoreError {
    /// Whether this error is a user-visible "not found" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ListNotFound(_) | Self::TodoNotFound { .. })
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::TodoNotFound { list_id, todo_id } => {
                write!(f, "todo {todo_id} not found in list {list_id}")
            }
            Self::Unavailable(err) => write!(f, "store unavailable: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "todo store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "todo store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "todo store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::IdSpaceExhausted { list_id: None } => write!(f, "no list ids left to issue"),
            Self::IdSpaceExhausted {
                list_id: Some(list_id),
            } => write!(f, "no todo ids left to issue in list {list_id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(DbError::Sqlite(value))
    }
}

/// Persistence contract shared by the session and SQLite backends.
pub trait TodoStore {
    /// Returns every list with its todos, in insertion order.
    fn all_lists(&self) -> StoreResult<Vec<TodoList>>;
    /// Looks up one list by id. A missing list is `Ok(None)`.
    fn find_list(&self, id: ListId) -> StoreResult<Option<TodoList>>;
    /// Creates an empty list and returns its fresh id.
    fn add_list(&mut self, name: &str) -> StoreResult<ListId>;
    /// Removes a list together with all of its todos.
    fn delete_list(&mut self, id: ListId) -> StoreResult<()>;
    /// Replaces the list name.
    fn rename_list(&mut self, id: ListId, new_name: &str) -> StoreResult<()>;
    /// Appends an incomplete todo and returns its fresh per-list id.
    fn add_todo(&mut self, list_id: ListId, text: &str) -> StoreResult<TodoId>;
    /// Removes one todo from its list.
    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<()>;
    /// Sets the completion flag of one todo.
    fn set_todo_completed(
        &mut self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> StoreResult<()>;
    /// Marks every todo of the list completed.
    fn complete_all_todos(&mut self, list_id: ListId) -> StoreResult<()>;
}

impl<S: TodoStore + ?Sized> TodoStore for Box<S> {
    fn all_lists(&self) -> StoreResult<Vec<TodoList>> {
        (**self).all_lists()
    }

    fn find_list(&self, id: ListId) -> StoreResult<Option<TodoList>> {
        (**self).find_list(id)
    }

    fn add_list(&mut self, name: &str) -> StoreResult<ListId> {
        (**self).add_list(name)
    }

    fn delete_list(&mut self, id: ListId) -> StoreResult<()> {
        (**self).delete_list(id)
    }

    fn rename_list(&mut self, id: ListId, new_name: &str) -> StoreResult<()> {
        (**self).rename_list(id, new_name)
    }

    fn add_todo(&mut self, list_id: ListId, text: &str) -> StoreResult<TodoId> {
        (**self).add_todo(list_id, text)
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<()> {
        (**self).delete_todo(list_id, todo_id)
    }

    fn set_todo_completed(
        &mut self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> StoreResult<()> {
        (**self).set_todo_completed(list_id, todo_id, completed)
    }

    fn complete_all_todos(&mut self, list_id: ListId) -> StoreResult<()> {
        (**self).complete_all_todos(list_id)
    }
}
