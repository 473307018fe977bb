//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Map typed project/task records to the persisted key layout.
//! - Return semantic errors (`NotFound`, `Conflict`, `InvalidInput`) in
//!   addition to store transport errors.
//!
//! # Invariants
//! - Write paths validate input before issuing any store command.
//! - Single-record reads reject invalid persisted state with `InvalidData`;
//!   list reads skip such records and log them.
//! - Multi-command writes are not atomic; a failure between commands can
//!   leave an orphan hash or list entry.
//!
//! # Key layout
//! - `project:<id>`: hash `{id, name, createdAt}`
//! - `project:index`: set of project ids
//! - `project:<id>:tasks`: list of task ids in insertion order
//! - `task:<id>`: hash `{id, projectId, title, done, createdAt, completedAt}`

pub mod project_repo;
pub mod task_repo;

use crate::model::ModelValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const PROJECT_INDEX_KEY: &str = "project:index";

pub fn project_key(project_id: &str) -> String {
    format!("project:{project_id}")
}

pub fn project_tasks_key(project_id: &str) -> String {
    format!("project:{project_id}:tasks")
}

pub fn task_key(task_id: &str) -> String {
    format!("task:{task_id}")
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Kind of record a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Project,
    Task,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Task => write!(f, "task"),
        }
    }
}

/// Repository error taxonomy surfaced to callers.
#[derive(Debug)]
pub enum RepoError {
    /// Required text field is empty or unusable as an id.
    InvalidInput(ModelValidationError),
    NotFound { kind: RecordKind, id: String },
    /// Stored task belongs to a different project than requested.
    Conflict {
        task_id: String,
        requested_project: String,
        stored_project: String,
    },
    /// Store could not be reached.
    StoreUnavailable(StoreError),
    /// Store answered with a command-level failure.
    Store(StoreError),
    /// Persisted record cannot be decoded into a valid model.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn project_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Project,
            id: id.to_string(),
        }
    }

    pub(crate) fn task_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Task,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code for protocol envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Store(_) => "STORE_ERROR",
            Self::InvalidData(_) => "INVALID_DATA",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict {
                task_id,
                requested_project,
                stored_project,
            } => write!(
                f,
                "project mismatch: task `{task_id}` belongs to `{stored_project}`, not `{requested_project}`"
            ),
            Self::StoreUnavailable(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::StoreUnavailable(err) | Self::Store(err) => Some(err),
            Self::NotFound { .. } | Self::Conflict { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        if value.is_connection_error() {
            Self::StoreUnavailable(value)
        } else {
            Self::Store(value)
        }
    }
}

/// Reads a required text field from a decoded hash.
pub(crate) fn required_field<'a>(
    fields: &'a crate::store::FieldMap,
    key: &str,
    name: &str,
) -> RepoResult<&'a str> {
    fields.get(name).map(String::as_str).ok_or_else(|| {
        RepoError::InvalidData(format!("missing field `{name}` in `{key}`"))
    })
}

pub(crate) fn parse_timestamp_field(
    key: &str,
    name: &str,
    value: &str,
) -> RepoResult<crate::model::timestamp::Timestamp> {
    crate::model::timestamp::parse_timestamp(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in `{key}`.{name}"))
    })
}
