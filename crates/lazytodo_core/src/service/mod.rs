//! Core use-case services.
//!
//! # Responsibility
//! - Combine validation, store calls and derived state into request-level
//!   operations.
//! - Keep callers (CLI, web layers) decoupled from store details.

pub mod todo_service;
