//! List and todo records.
//!
//! # Responsibility
//! - Define the typed shape every store backend reads and writes.
//!
//! # Invariants
//! - `TodoList::todos` keeps insertion order.
//! - A todo never appears in more than one list.

use serde::{Deserialize, Serialize};

/// Store-assigned list identifier.
pub type ListId = i64;

/// Store-assigned todo identifier, unique only within its parent list.
pub type TodoId = i64;

/// One todo entry owned by exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub completed: bool,
}

impl Todo {
    /// Creates an incomplete todo.
    pub fn new(id: TodoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
        }
    }
}

/// Named, ordered collection of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new(id: ListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            todos: Vec::new(),
        }
    }

    /// Looks up one todo by its per-list id.
    pub fn todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    pub(crate) fn todo_mut(&mut self, todo_id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }
}
