//! Derived completion state and display ordering.
//!
//! # Responsibility
//! - Count total/undone todos and decide list completion.
//! - Order lists and todos incomplete-first for presentation.
//!
//! # Invariants
//! - An empty list is never complete.
//! - Ordering is a stable partition: relative order inside the incomplete
//!   and complete groups is preserved.

use crate::model::todo_list::{ListId, Todo, TodoList};
use serde::Serialize;

/// Marker attached to finished lists and todos in rendered views.
pub const COMPLETE_CLASS: &str = "complete";

/// Number of todos in the list.
pub fn total_count(list: &TodoList) -> usize {
    list.todos.len()
}

/// Number of todos not yet completed.
pub fn undone_count(list: &TodoList) -> usize {
    list.todos.iter().filter(|todo| !todo.completed).count()
}

/// Whether every todo is done and there is at least one.
pub fn is_list_complete(list: &TodoList) -> bool {
    undone_count(list) == 0 && total_count(list) > 0
}

/// Stable-partitions items into incomplete first, then complete.
pub fn partition_order<T, F>(items: impl IntoIterator<Item = T>, is_done: F) -> Vec<T>
where
    F: Fn(&T) -> bool,
{
    let (done, mut pending): (Vec<T>, Vec<T>) = items.into_iter().partition(|item| is_done(item));
    pending.extend(done);
    pending
}

/// Lists ordered for display: incomplete lists first.
pub fn sort_lists(lists: &[TodoList]) -> Vec<&TodoList> {
    partition_order(lists, |list| is_list_complete(list))
}

/// Todos of one list ordered for display: incomplete todos first.
pub fn sort_todos(list: &TodoList) -> Vec<&Todo> {
    partition_order(&list.todos, |todo| todo.completed)
}

/// CSS-style class for a finished item, `None` otherwise.
pub fn status_class(done: bool) -> Option<&'static str> {
    done.then_some(COMPLETE_CLASS)
}

/// Aggregate row shown for one list on an index view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub id: ListId,
    pub name: String,
    pub total: usize,
    pub undone: usize,
    pub complete: bool,
}

/// Builds the aggregate row for one list.
pub fn summarize(list: &TodoList) -> ListSummary {
    ListSummary {
        id: list.id,
        name: list.name.clone(),
        total: total_count(list),
        undone: undone_count(list),
        complete: is_list_complete(list),
    }
}
