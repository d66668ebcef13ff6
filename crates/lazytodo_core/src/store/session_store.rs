//! Session-backed (ephemeral) todo store.
//!
//! # Responsibility
//! - Keep lists and todos inside a caller-owned `SessionState` container.
//! - Allocate list and todo ids from per-session high-water marks.
//!
//! # Invariants
//! - The store borrows the session exclusively for its lifetime; there is no
//!   process-wide state.
//! - Issued ids are never handed out again, even after deletion.
//! - A failing operation leaves the session unchanged.

use crate::model::todo_list::{ListId, Todo, TodoId, TodoList};
use crate::store::{StoreError, StoreResult, TodoStore};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-session container holding lists and id counters.
///
/// Serializable so a caller can persist it between requests (cookie, file).
/// Payloads that only carry `lists` are accepted; counters are then
/// recovered from the highest ids present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    lists: Vec<TodoList>,
    #[serde(default)]
    last_list_id: ListId,
    #[serde(default)]
    last_todo_ids: BTreeMap<ListId, TodoId>,
}

impl SessionState {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a session from its JSON payload.
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    /// Serializes the session for the caller to persist.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Lists currently held by the session.
    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    fn list(&self, id: ListId) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == id)
    }

    fn list_mut(&mut self, id: ListId) -> StoreResult<&mut TodoList> {
        self.lists
            .iter_mut()
            .find(|list| list.id == id)
            .ok_or(StoreError::ListNotFound(id))
    }

    fn next_list_id(&mut self) -> StoreResult<ListId> {
        let highest = self.lists.iter().map(|list| list.id).max().unwrap_or(0);
        self.last_list_id = self
            .last_list_id
            .max(highest)
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted { list_id: None })?;
        Ok(self.last_list_id)
    }

    fn next_todo_id(&mut self, list_id: ListId) -> StoreResult<TodoId> {
        let highest = self
            .list(list_id)
            .ok_or(StoreError::ListNotFound(list_id))?
            .todos
            .iter()
            .map(|todo| todo.id)
            .max()
            .unwrap_or(0);
        let last = self.last_todo_ids.get(&list_id).copied().unwrap_or(0);
        let next = last
            .max(highest)
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted {
                list_id: Some(list_id),
            })?;
        self.last_todo_ids.insert(list_id, next);
        Ok(next)
    }
}

/// Todo store operating on one borrowed session.
pub struct SessionTodoStore<'session> {
    session: &'session mut SessionState,
}

impl<'session> SessionTodoStore<'session> {
    /// Attaches a store to the session for the duration of one request.
    pub fn new(session: &'session mut SessionState) -> Self {
        debug!(
            "event=store_open module=store backend=session lists={}",
            session.lists.len()
        );
        Self { session }
    }
}

impl TodoStore for SessionTodoStore<'_> {
    fn all_lists(&self) -> StoreResult<Vec<TodoList>> {
        Ok(self.session.lists.clone())
    }

    fn find_list(&self, id: ListId) -> StoreResult<Option<TodoList>> {
        Ok(self.session.list(id).cloned())
    }

    fn add_list(&mut self, name: &str) -> StoreResult<ListId> {
        let id = self.session.next_list_id()?;
        self.session.lists.push(TodoList::new(id, name));
        Ok(id)
    }

    fn delete_list(&mut self, id: ListId) -> StoreResult<()> {
        let before = self.session.lists.len();
        self.session.lists.retain(|list| list.id != id);
        if self.session.lists.len() == before {
            return Err(StoreError::ListNotFound(id));
        }
        self.session.last_todo_ids.remove(&id);
        Ok(())
    }

    fn rename_list(&mut self, id: ListId, new_name: &str) -> StoreResult<()> {
        self.session.list_mut(id)?.name = new_name.to_string();
        Ok(())
    }

    fn add_todo(&mut self, list_id: ListId, text: &str) -> StoreResult<TodoId> {
        let todo_id = self.session.next_todo_id(list_id)?;
        self.session
            .list_mut(list_id)?
            .todos
            .push(Todo::new(todo_id, text));
        Ok(todo_id)
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<()> {
        let list = self.session.list_mut(list_id)?;
        let position = list
            .todos
            .iter()
            .position(|todo| todo.id == todo_id)
            .ok_or(StoreError::TodoNotFound { list_id, todo_id })?;
        list.todos.remove(position);
        Ok(())
    }

    fn set_todo_completed(
        &mut self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> StoreResult<()> {
        let todo = self
            .session
            .list_mut(list_id)?
            .todo_mut(todo_id)
            .ok_or(StoreError::TodoNotFound { list_id, todo_id })?;
        todo.completed = completed;
        Ok(())
    }

    fn complete_all_todos(&mut self, list_id: ListId) -> StoreResult<()> {
        for todo in &mut self.session.list_mut(list_id)?.todos {
            todo.completed = true;
        }
        Ok(())
    }
}
