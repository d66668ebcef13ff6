//! Todo use-case service.
//!
//! # Responsibility
//! - Trim and validate user input before any store mutation.
//! - Turn missing lists/todos into user-facing "not found" errors.
//! - Produce display-ordered views of lists and todos.
//!
//! # Invariants
//! - Validation failures never reach the store.
//! - Service layer remains backend-agnostic.

use crate::model::progress::{is_list_complete, partition_order, summarize, ListSummary};
use crate::model::todo_list::{ListId, TodoId, TodoList};
use crate::model::validation::{validate_list_name, validate_todo_text, ValidationError};
use crate::store::{StoreError, TodoStore};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Input rejected before any mutation.
    Validation(ValidationError),
    /// Target list does not exist.
    ListNotFound(ListId),
    /// Target todo does not exist in an existing list.
    TodoNotFound { list_id: ListId, todo_id: TodoId },
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ListNotFound(_) => write!(f, "The specified list was not found."),
            Self::TodoNotFound { .. } => write!(f, "The specified todo was not found."),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for TodoServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for TodoServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::ListNotFound(list_id) => Self::ListNotFound(list_id),
            StoreError::TodoNotFound { list_id, todo_id } => {
                Self::TodoNotFound { list_id, todo_id }
            }
            other => Self::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// Todo service facade over one store handle.
pub struct TodoService<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> TodoService<S> {
    /// Creates a service using the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Releases the store handle.
    pub fn into_store(self) -> S {
        self.store
    }

    /// All lists, incomplete lists first.
    pub fn lists(&self) -> ServiceResult<Vec<TodoList>> {
        let lists = self.store.all_lists()?;
        Ok(partition_order(lists, is_list_complete))
    }

    /// Aggregate rows for every list, incomplete lists first.
    pub fn list_summaries(&self) -> ServiceResult<Vec<ListSummary>> {
        Ok(self.lists()?.iter().map(summarize).collect())
    }

    /// Loads one list with its todos ordered incomplete-first.
    pub fn load_list(&self, list_id: ListId) -> ServiceResult<TodoList> {
        let mut list = self
            .store
            .find_list(list_id)?
            .ok_or(TodoServiceError::ListNotFound(list_id))?;
        list.todos = partition_order(list.todos, |todo| todo.completed);
        Ok(list)
    }

    /// Validates and creates a list.
    pub fn create_list(&mut self, name: &str) -> ServiceResult<ListId> {
        let name = name.trim();
        let lists = self.store.all_lists()?;
        validate_list_name(name, lists.iter().map(|list| list.name.as_str()))?;

        let list_id = self.store.add_list(name)?;
        info!("event=list_create module=service status=ok list_id={list_id}");
        Ok(list_id)
    }

    /// Validates and renames a list.
    ///
    /// Uniqueness is checked against the other lists only, so renaming a
    /// list to its current name succeeds. A name-change form that must
    /// reject an unchanged name has to compare against the current name
    /// itself.
    pub fn rename_list(&mut self, list_id: ListId, new_name: &str) -> ServiceResult<()> {
        let new_name = new_name.trim();
        let lists = self.store.all_lists()?;
        if !lists.iter().any(|list| list.id == list_id) {
            return Err(TodoServiceError::ListNotFound(list_id));
        }
        validate_list_name(
            new_name,
            lists
                .iter()
                .filter(|list| list.id != list_id)
                .map(|list| list.name.as_str()),
        )?;

        self.store.rename_list(list_id, new_name)?;
        info!("event=list_rename module=service status=ok list_id={list_id}");
        Ok(())
    }

    /// Deletes a list and its todos.
    pub fn delete_list(&mut self, list_id: ListId) -> ServiceResult<()> {
        self.store.delete_list(list_id)?;
        info!("event=list_delete module=service status=ok list_id={list_id}");
        Ok(())
    }

    /// Validates todo text and appends it to an existing list.
    pub fn add_todo(&mut self, list_id: ListId, text: &str) -> ServiceResult<TodoId> {
        let text = text.trim();
        if self.store.find_list(list_id)?.is_none() {
            return Err(TodoServiceError::ListNotFound(list_id));
        }
        validate_todo_text(text)?;

        let todo_id = self.store.add_todo(list_id, text)?;
        info!("event=todo_create module=service status=ok list_id={list_id} todo_id={todo_id}");
        Ok(todo_id)
    }

    /// Deletes one todo.
    pub fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> ServiceResult<()> {
        self.store.delete_todo(list_id, todo_id)?;
        info!("event=todo_delete module=service status=ok list_id={list_id} todo_id={todo_id}");
        Ok(())
    }

    /// Marks one todo done or not done.
    pub fn set_todo_completed(
        &mut self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> ServiceResult<()> {
        self.store.set_todo_completed(list_id, todo_id, completed)?;
        info!(
            "event=todo_update module=service status=ok list_id={list_id} todo_id={todo_id} completed={completed}"
        );
        Ok(())
    }

    /// Marks every todo of the list done.
    pub fn complete_all_todos(&mut self, list_id: ListId) -> ServiceResult<()> {
        self.store.complete_all_todos(list_id)?;
        info!("event=todo_complete_all module=service status=ok list_id={list_id}");
        Ok(())
    }
}
