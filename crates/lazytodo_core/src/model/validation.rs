//! Input validation applied before store mutations.
//!
//! # Responsibility
//! - Check list-name and todo-text length bounds.
//! - Check list-name uniqueness against caller-supplied names.
//!
//! # Invariants
//! - Validation never touches a store.
//! - Length is counted in Unicode scalar values, bounds inclusive.
//! - Length is checked before uniqueness.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Accepted length range for list names and todo text.
pub const NAME_LENGTH: RangeInclusive<usize> = 1..=100;

/// Which input a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSubject {
    ListName,
    TodoText,
}

/// Why an input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Input is outside `NAME_LENGTH`.
    Length,
    /// List name is already used by another list.
    Uniqueness,
}

/// User-facing rejection of list-name or todo-text input.
///
/// `Display` renders the message shown back to the user next to the
/// preserved input. Todo text is only ever rejected for its length, so the
/// fields stay private and only the valid pairs are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    subject: ValidationSubject,
    kind: ValidationErrorKind,
}

impl ValidationError {
    fn list_name(kind: ValidationErrorKind) -> Self {
        Self {
            subject: ValidationSubject::ListName,
            kind,
        }
    }

    fn todo_text_length() -> Self {
        Self {
            subject: ValidationSubject::TodoText,
            kind: ValidationErrorKind::Length,
        }
    }

    /// Which input was rejected.
    pub fn subject(&self) -> ValidationSubject {
        self.subject
    }

    /// Why the input was rejected.
    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.subject, self.kind) {
            (ValidationSubject::ListName, ValidationErrorKind::Length) => write!(
                f,
                "The list name must be between {} and {} characters.",
                NAME_LENGTH.start(),
                NAME_LENGTH.end()
            ),
            (ValidationSubject::ListName, ValidationErrorKind::Uniqueness) => {
                write!(f, "The list name must be unique.")
            }
            (ValidationSubject::TodoText, _) => write!(
                f,
                "The todo entry must be between {} and {} characters.",
                NAME_LENGTH.start(),
                NAME_LENGTH.end()
            ),
        }
    }
}

impl Error for ValidationError {}

/// Validates a list name against length bounds and existing names.
pub fn validate_list_name<'a, I>(name: &str, existing_names: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    if !has_valid_length(name) {
        return Err(ValidationError::list_name(ValidationErrorKind::Length));
    }

    if existing_names.into_iter().any(|existing| existing == name) {
        return Err(ValidationError::list_name(ValidationErrorKind::Uniqueness));
    }

    Ok(())
}

/// Validates todo text against length bounds.
pub fn validate_todo_text(text: &str) -> Result<(), ValidationError> {
    if has_valid_length(text) {
        Ok(())
    } else {
        Err(ValidationError::todo_text_length())
    }
}

fn has_valid_length(value: &str) -> bool {
    NAME_LENGTH.contains(&value.chars().count())
}
