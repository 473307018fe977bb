//! Core domain logic for LazyTask.
//! This crate is the single source of truth for project/task invariants and
//! the persisted key-value layout.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slug;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::project::{Project, ProjectId};
pub use model::task::{Task, TaskId};
pub use model::timestamp::Timestamp;
pub use model::ModelValidationError;
pub use repo::project_repo::{ProjectRepository, StoreProjectRepository};
pub use repo::task_repo::{StoreTaskRepository, TaskRepository};
pub use repo::{RecordKind, RepoError, RepoResult};
pub use service::board_service::BoardService;
pub use slug::slugify;
pub use store::{StoreClient, StoreError, StoreResult, StoreUrl};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
