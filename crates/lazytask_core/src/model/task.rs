//! Task domain model.
//!
//! # Invariants
//! - `done == false` implies `completed_at == None`.
//! - `done == true` implies `completed_at >= created_at`.
//! - Task ids are slugs of the title only; they are not scoped by project.

use super::project::ProjectId;
use super::timestamp::{self, Timestamp};
use super::{derive_id, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Slug identifying a task in the global task namespace.
pub type TaskId = String;

/// A unit of work owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Lookup reference to the owning project. Validated at creation only.
    pub project_id: ProjectId,
    pub title: String,
    pub done: bool,
    #[serde(with = "timestamp::iso")]
    pub created_at: Timestamp,
    #[serde(with = "timestamp::iso_opt", default)]
    pub completed_at: Option<Timestamp>,
}

impl Task {
    /// Builds an open task for `project_id`, stamped with the current time.
    ///
    /// # Errors
    /// - `EmptyField("title")` when `title` is blank.
    /// - `EmptySlug` when `title` has no ASCII letters or digits.
    pub fn new(
        project_id: impl Into<ProjectId>,
        title: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        let title = title.into();
        let id = derive_id("title", &title)?;
        Ok(Self {
            id,
            project_id: project_id.into(),
            title,
            done: false,
            created_at: timestamp::now(),
            completed_at: None,
        })
    }

    /// Marks the task done at `at`.
    ///
    /// Repeated calls refresh `completed_at`. The instant is clamped to
    /// `created_at` so a skewed clock cannot break ordering.
    pub fn complete(&mut self, at: Timestamp) {
        self.done = true;
        self.completed_at = Some(at.max(self.created_at));
    }

    /// Checks invariants of a record decoded from storage.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.trim().is_empty() {
            return Err(ModelValidationError::EmptyField("id"));
        }
        if self.project_id.trim().is_empty() {
            return Err(ModelValidationError::EmptyField("projectId"));
        }
        match (self.done, self.completed_at) {
            (false, Some(_)) => Err(ModelValidationError::CompletedAtWithoutDone),
            (true, None) => Err(ModelValidationError::DoneWithoutCompletedAt),
            (true, Some(completed_at)) if completed_at < self.created_at => {
                Err(ModelValidationError::CompletedBeforeCreated)
            }
            _ => Ok(()),
        }
    }
}
