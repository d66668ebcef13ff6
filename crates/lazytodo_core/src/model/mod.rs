//! Domain model for todo lists.
//!
//! # Responsibility
//! - Define the list/todo records shared by every store backend.
//! - Host the pure validation and derived-state functions callers apply
//!   around store operations.
//!
//! # Invariants
//! - List ids are unique per store; todo ids are unique per owning list.
//! - Nothing in this module mutates a store.

pub mod progress;
pub mod todo_list;
pub mod validation;
