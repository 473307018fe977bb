//! Task repository contract and store-backed implementation.
//!
//! # Invariants
//! - `add_task` checks that the project hash exists before writing anything;
//!   ids that are not project slugs never reach the store.
//! - A task id appears at most once in its project's task list.
//! - Task ids are not scoped by project: equal titles in two projects share
//!   one `task:<id>` hash, and the later write owns its `projectId`.
//! - `complete_task` is an unconditional overwrite (last writer wins).
//! - `list_tasks` skips records that fail to decode; `complete_task`
//!   reports them as `InvalidData`.

use super::{
    parse_timestamp_field, project_key, project_tasks_key, required_field, task_key, RepoError,
    RepoResult,
};
use crate::model::project::is_valid_project_id;
use crate::model::task::Task;
use crate::model::timestamp::{self, format_timestamp};
use crate::store::{FieldMap, StoreClient};
use log::{info, warn};

const DONE_TRUE: &str = "true";
const DONE_FALSE: &str = "false";

/// Repository interface for task records.
pub trait TaskRepository {
    fn add_task(&self, project_id: &str, title: &str) -> RepoResult<Task>;
    fn list_tasks(&self, project_id: &str) -> RepoResult<Vec<Task>>;
    fn complete_task(&self, project_id: &str, task_id: &str) -> RepoResult<Task>;
}

/// Task repository over the shared store client.
pub struct StoreTaskRepository<'store> {
    store: &'store StoreClient,
}

impl<'store> StoreTaskRepository<'store> {
    pub fn new(store: &'store StoreClient) -> Self {
        Self { store }
    }
}

impl TaskRepository for StoreTaskRepository<'_> {
    fn add_task(&self, project_id: &str, title: &str) -> RepoResult<Task> {
        let project_exists = is_valid_project_id(project_id)
            && self.store.hexists(&project_key(project_id), "id")?;
        if !project_exists {
            return Err(RepoError::project_not_found(project_id));
        }
        let task = Task::new(project_id, title)?;

        let key = task_key(&task.id);
        let fields = encode_task(&task);
        self.store.hset(&key, &borrow_fields(&fields))?;

        let list_key = project_tasks_key(project_id);
        let listed = self.store.lrange_all(&list_key)?;
        if listed.iter().any(|id| id == &task.id) {
            warn!(
                "event=task_add module=repo status=overwrite project_id={project_id} task_id={}",
                task.id
            );
        } else {
            self.store.rpush(&list_key, &task.id)?;
        }

        info!(
            "event=task_add module=repo status=ok project_id={project_id} task_id={}",
            task.id
        );
        Ok(task)
    }

    fn list_tasks(&self, project_id: &str) -> RepoResult<Vec<Task>> {
        let ids = self.store.lrange_all(&project_tasks_key(project_id))?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys = ids.iter().map(|id| task_key(id)).collect::<Vec<_>>();
        let rows = self.store.hgetall_many(&keys)?;

        let mut tasks = Vec::with_capacity(rows.len());
        for (key, fields) in keys.iter().zip(rows.iter()) {
            match decode_task(key, fields) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => {}
                Err(err) => warn!(
                    "event=task_list module=repo status=skipped project_id={project_id} key={key} error={err}"
                ),
            }
        }
        Ok(tasks)
    }

    fn complete_task(&self, project_id: &str, task_id: &str) -> RepoResult<Task> {
        let key = task_key(task_id);
        let fields = self.store.hgetall(&key)?;
        let mut task =
            decode_task(&key, &fields)?.ok_or_else(|| RepoError::task_not_found(task_id))?;

        if task.project_id != project_id {
            return Err(RepoError::Conflict {
                task_id: task_id.to_string(),
                requested_project: project_id.to_string(),
                stored_project: task.project_id,
            });
        }

        task.complete(timestamp::now());
        let completed_at = task
            .completed_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default();
        self.store.hset(
            &key,
            &[("done", DONE_TRUE), ("completedAt", completed_at.as_str())],
        )?;

        info!("event=task_complete module=repo status=ok project_id={project_id} task_id={task_id}");
        Ok(task)
    }
}

fn encode_task(task: &Task) -> Vec<(&'static str, String)> {
    vec![
        ("id", task.id.clone()),
        ("projectId", task.project_id.clone()),
        ("title", task.title.clone()),
        ("done", if task.done { DONE_TRUE } else { DONE_FALSE }.to_string()),
        ("createdAt", format_timestamp(&task.created_at)),
        (
            "completedAt",
            task.completed_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_default(),
        ),
    ]
}

fn borrow_fields<'a>(fields: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    fields
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect()
}

/// Decodes a task hash; `None` when the hash is empty or lacks `id`.
fn decode_task(key: &str, fields: &FieldMap) -> RepoResult<Option<Task>> {
    let Some(id) = fields.get("id").filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let done = match required_field(fields, key, "done")? {
        DONE_TRUE => true,
        DONE_FALSE => false,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in `{key}`"
            )));
        }
    };
    let created_at_text = required_field(fields, key, "createdAt")?;
    let created_at = parse_timestamp_field(key, "createdAt", created_at_text)?;
    let completed_at = match fields.get("completedAt").map(String::as_str) {
        None | Some("") => None,
        Some(value) => Some(parse_timestamp_field(key, "completedAt", value)?),
    };

    let task = Task {
        id: id.clone(),
        project_id: required_field(fields, key, "projectId")?.to_string(),
        title: required_field(fields, key, "title")?.to_string(),
        done,
        created_at,
        completed_at,
    };
    task.validate()
        .map_err(|err| RepoError::InvalidData(format!("{key}: {err}")))?;
    Ok(Some(task))
}
