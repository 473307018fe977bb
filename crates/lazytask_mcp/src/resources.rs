//! `tasks://{projectId}` resource template.

use lazytask_core::{BoardService, RepoResult, StoreClient};
use serde_json::{json, Value};

pub const TASKS_URI_PREFIX: &str = "tasks://";

pub fn resource_templates() -> Vec<Value> {
    vec![json!({
        "uriTemplate": "tasks://{projectId}",
        "name": "project-tasks",
        "title": "Tasks",
        "description": "Tasks of one project with their completion state",
        "mimeType": "text/plain",
    })]
}

/// Extracts the project id from a `tasks://<projectId>` URI.
pub fn parse_tasks_uri(uri: &str) -> Option<&str> {
    let project_id = uri.strip_prefix(TASKS_URI_PREFIX)?.trim_end_matches('/');
    if project_id.is_empty() || project_id.contains('/') {
        return None;
    }
    Some(project_id)
}

/// Renders one text content entry per task of `project_id`.
pub fn read_tasks_resource(store: &StoreClient, uri: &str, project_id: &str) -> RepoResult<Value> {
    let lines = BoardService::for_store(store).task_resource_lines(project_id)?;
    let contents = lines
        .into_iter()
        .map(|text| json!({ "uri": uri, "mimeType": "text/plain", "text": text }))
        .collect::<Vec<_>>();
    Ok(json!({ "contents": contents }))
}

#[cfg(test)]
mod tests {
    use super::parse_tasks_uri;

    #[test]
    fn parse_tasks_uri_extracts_project_id() {
        assert_eq!(parse_tasks_uri("tasks://my-project"), Some("my-project"));
        assert_eq!(parse_tasks_uri("tasks://my-project/"), Some("my-project"));
        assert_eq!(parse_tasks_uri("tasks://"), None);
        assert_eq!(parse_tasks_uri("tasks://a/b"), None);
        assert_eq!(parse_tasks_uri("notes://x"), None);
    }
}
