//! Project domain model.
//!
//! # Invariants
//! - `id == slugify(name)` for records created through `Project::new`.
//! - `created_at` is set once and never mutated.

use super::timestamp::{self, Timestamp};
use super::{derive_id, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Slug identifying a project; also the namespace prefix of its task list.
pub type ProjectId = String;

/// Slugs that would land on a fixed key of the `project:` namespace.
pub const RESERVED_PROJECT_IDS: &[&str] = &["index"];

/// Whether `id` can name a project: a non-reserved, already normalized slug.
pub fn is_valid_project_id(id: &str) -> bool {
    !id.is_empty() && !RESERVED_PROJECT_IDS.contains(&id) && crate::slug::slugify(id) == id
}

/// A named container for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    /// Name exactly as entered by the caller.
    pub name: String,
    #[serde(with = "timestamp::iso")]
    pub created_at: Timestamp,
}

impl Project {
    /// Builds a fresh project stamped with the current time.
    ///
    /// # Errors
    /// - `EmptyField("name")` when `name` is blank.
    /// - `EmptySlug` when `name` has no ASCII letters or digits.
    /// - `ReservedId` when the slug is one of `RESERVED_PROJECT_IDS`.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelValidationError> {
        let name = name.into();
        let id = derive_id("name", &name)?;
        if RESERVED_PROJECT_IDS.contains(&id.as_str()) {
            return Err(ModelValidationError::ReservedId { field: "name", id });
        }
        Ok(Self {
            id,
            name,
            created_at: timestamp::now(),
        })
    }

    /// Checks invariants of a record decoded from storage.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.trim().is_empty() {
            return Err(ModelValidationError::EmptyField("id"));
        }
        Ok(())
    }
}
