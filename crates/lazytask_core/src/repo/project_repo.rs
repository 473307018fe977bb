//! Project repository contract and store-backed implementation.
//!
//! # Invariants
//! - `create_project` never checks for an existing record; re-creating a
//!   project with the same slug overwrites `name` and `createdAt`.
//! - A project hash without an `id` field is treated as absent.
//! - `list_projects` skips records that fail to decode; `get_project`
//!   reports them as `InvalidData`.

use super::{
    parse_timestamp_field, project_key, required_field, RepoError, RepoResult,
    PROJECT_INDEX_KEY,
};
use crate::model::project::{is_valid_project_id, Project};
use crate::model::timestamp::format_timestamp;
use crate::store::{FieldMap, StoreClient};
use log::{info, warn};

/// Repository interface for project records.
pub trait ProjectRepository {
    fn create_project(&self, name: &str) -> RepoResult<Project>;
    fn get_project(&self, id: &str) -> RepoResult<Project>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
}

/// Project repository over the shared store client.
pub struct StoreProjectRepository<'store> {
    store: &'store StoreClient,
}

impl<'store> StoreProjectRepository<'store> {
    pub fn new(store: &'store StoreClient) -> Self {
        Self { store }
    }
}

impl ProjectRepository for StoreProjectRepository<'_> {
    fn create_project(&self, name: &str) -> RepoResult<Project> {
        let project = Project::new(name)?;
        let created_at = format_timestamp(&project.created_at);

        self.store.hset(
            &project_key(&project.id),
            &[
                ("id", project.id.as_str()),
                ("name", project.name.as_str()),
                ("createdAt", created_at.as_str()),
            ],
        )?;
        self.store.sadd(PROJECT_INDEX_KEY, &project.id)?;

        info!(
            "event=project_create module=repo status=ok project_id={}",
            project.id
        );
        Ok(project)
    }

    fn get_project(&self, id: &str) -> RepoResult<Project> {
        if !is_valid_project_id(id) {
            return Err(RepoError::project_not_found(id));
        }
        let key = project_key(id);
        let fields = self.store.hgetall(&key)?;
        decode_project(&key, &fields)?.ok_or_else(|| RepoError::project_not_found(id))
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let ids = self.store.smembers(PROJECT_INDEX_KEY)?;
        let keys = ids.iter().map(|id| project_key(id)).collect::<Vec<_>>();
        let rows = self.store.hgetall_many(&keys)?;

        let mut projects = Vec::with_capacity(rows.len());
        for (key, fields) in keys.iter().zip(rows.iter()) {
            match decode_project(key, fields) {
                Ok(Some(project)) => projects.push(project),
                Ok(None) => {}
                Err(err) => warn!(
                    "event=project_list module=repo status=skipped key={key} error={err}"
                ),
            }
        }
        Ok(projects)
    }
}

/// Decodes a project hash; `None` when the hash is empty or lacks `id`.
fn decode_project(key: &str, fields: &FieldMap) -> RepoResult<Option<Project>> {
    let Some(id) = fields.get("id").filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let created_at_text = required_field(fields, key, "createdAt")?;
    let project = Project {
        id: id.clone(),
        name: required_field(fields, key, "name")?.to_string(),
        created_at: parse_timestamp_field(key, "createdAt", created_at_text)?,
    };
    project
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("{key}: {err}")))?;
    Ok(Some(project))
}
