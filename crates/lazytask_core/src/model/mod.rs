//! Domain records for projects and their tasks.
//!
//! # Responsibility
//! - Define the typed `Project` / `Task` records handed to callers.
//! - Own record-level invariants independent of storage encoding.
//!
//! # Invariants
//! - Record ids are slugs derived from human text.
//! - A task's completion transition is one-way (`done` never returns to false).

pub mod project;
pub mod task;
pub mod timestamp;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record invariant violations shared by project and task models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Required text field is empty or whitespace-only.
    EmptyField(&'static str),
    /// Text is non-empty but contains nothing a slug can be built from.
    EmptySlug { field: &'static str, value: String },
    /// Slug collides with a fixed key of the persisted layout.
    ReservedId { field: &'static str, id: String },
    /// `done=false` while `completedAt` is set.
    CompletedAtWithoutDone,
    /// `done=true` while `completedAt` is missing.
    DoneWithoutCompletedAt,
    /// `completedAt` precedes `createdAt`.
    CompletedBeforeCreated,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::EmptySlug { field, value } => write!(
                f,
                "`{field}` value `{value}` does not contain any letters or digits"
            ),
            Self::ReservedId { field, id } => {
                write!(f, "`{field}` slugs to reserved id `{id}`")
            }
            Self::CompletedAtWithoutDone => {
                write!(f, "task has `completedAt` but is not marked done")
            }
            Self::DoneWithoutCompletedAt => {
                write!(f, "task is marked done but has no `completedAt`")
            }
            Self::CompletedBeforeCreated => {
                write!(f, "task `completedAt` is earlier than `createdAt`")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// Checks a required text field and derives its slug id.
pub(crate) fn derive_id(field: &'static str, value: &str) -> Result<String, ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::EmptyField(field));
    }
    let id = crate::slug::slugify(value);
    if id.is_empty() {
        return Err(ModelValidationError::EmptySlug {
            field,
            value: value.to_string(),
        });
    }
    Ok(id)
}
