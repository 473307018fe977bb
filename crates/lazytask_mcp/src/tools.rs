//! Tool catalog and argument validation.
//!
//! # Responsibility
//! - Declare input/output JSON schemas for every tool.
//! - Decode `tools/call` arguments into typed structs before touching the store.
//! - Shape repository results into MCP tool results.
//!
//! # Invariants
//! - Schema violations never reach the repositories.
//! - Repository failures become `isError` tool results, not JSON-RPC errors.

use crate::jsonrpc::{text_content, INTERNAL_ERROR, INVALID_PARAMS};
use lazytask_core::{BoardService, RepoError, StoreClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CREATE_PROJECT: &str = "create-project";
pub const LIST_PROJECTS: &str = "list-projects";
pub const ADD_TASK: &str = "add-task";
pub const LIST_TASKS: &str = "list-tasks";
pub const COMPLETE_TASK: &str = "complete-task";

/// Tool call failure reported as a JSON-RPC error rather than a tool result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidArguments { tool: String, message: String },
    /// Result could not be rendered to JSON.
    Internal { tool: String, message: String },
}

impl ToolCallError {
    pub fn message(&self) -> String {
        match self {
            Self::UnknownTool(name) => format!("Unknown tool: {name}"),
            Self::InvalidArguments { tool, message } => {
                format!("Invalid arguments for tool {tool}: {message}")
            }
            Self::Internal { tool, message } => {
                format!("Tool {tool} failed to render its result: {message}")
            }
        }
    }

    /// JSON-RPC error code for this failure.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::UnknownTool(_) | Self::InvalidArguments { .. } => INVALID_PARAMS,
            Self::Internal { .. } => INTERNAL_ERROR,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateProjectArgs {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AddTaskArgs {
    project_id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ListTasksArgs {
    project_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CompleteTaskArgs {
    project_id: String,
    task_id: String,
}

fn project_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "name": { "type": "string" },
            "createdAt": { "type": "string" }
        },
        "required": ["id", "name", "createdAt"]
    })
}

fn task_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "projectId": { "type": "string" },
            "title": { "type": "string" },
            "done": { "type": "boolean" },
            "createdAt": { "type": "string" },
            "completedAt": { "type": ["string", "null"] }
        },
        "required": ["id", "projectId", "title", "done", "createdAt", "completedAt"]
    })
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

fn non_empty_string() -> Value {
    json!({ "type": "string", "minLength": 1 })
}

/// Returns the advertised tool list for `tools/list`.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": CREATE_PROJECT,
            "title": "Create Project",
            "description": "Creates a new project",
            "inputSchema": object_schema(json!({ "name": non_empty_string() }), &["name"]),
            "outputSchema": object_schema(json!({ "project": project_schema() }), &["project"]),
        }),
        json!({
            "name": LIST_PROJECTS,
            "title": "List Projects",
            "description": "Lists all projects",
            "inputSchema": object_schema(json!({}), &[]),
            "outputSchema": object_schema(
                json!({ "projects": { "type": "array", "items": project_schema() } }),
                &["projects"],
            ),
        }),
        json!({
            "name": ADD_TASK,
            "title": "Add Task",
            "description": "Adds a new task to a project",
            "inputSchema": object_schema(
                json!({ "projectId": non_empty_string(), "title": non_empty_string() }),
                &["projectId", "title"],
            ),
            "outputSchema": object_schema(json!({ "task": task_schema() }), &["task"]),
        }),
        json!({
            "name": LIST_TASKS,
            "title": "List Tasks",
            "description": "Lists all tasks for a project",
            "inputSchema": object_schema(json!({ "projectId": non_empty_string() }), &["projectId"]),
            "outputSchema": object_schema(
                json!({ "tasks": { "type": "array", "items": task_schema() } }),
                &["tasks"],
            ),
        }),
        json!({
            "name": COMPLETE_TASK,
            "title": "Complete Task",
            "description": "Completes a task",
            "inputSchema": object_schema(
                json!({ "projectId": non_empty_string(), "taskId": non_empty_string() }),
                &["projectId", "taskId"],
            ),
            "outputSchema": object_schema(json!({ "task": task_schema() }), &["task"]),
        }),
    ]
}

/// Runs one tool call against `store`.
///
/// # Errors
/// - `UnknownTool` / `InvalidArguments` for requests that fail validation.
/// - `Internal` when a successful result cannot be serialized.
///
/// Repository failures are returned as `Ok` tool results with `isError: true`.
pub fn call_tool(store: &StoreClient, name: &str, args: Value) -> Result<Value, ToolCallError> {
    let service = BoardService::for_store(store);
    let result = match name {
        CREATE_PROJECT => {
            let args: CreateProjectArgs = decode_args(name, args)?;
            require_non_empty(name, "name", &args.name)?;
            service
                .create_project(&args.name)
                .map(|project| success(name, "Project created", "project", &project))
        }
        LIST_PROJECTS => {
            let _: NoArgs = decode_args(name, args)?;
            service
                .list_projects()
                .map(|projects| success(name, "Projects", "projects", &projects))
        }
        ADD_TASK => {
            let args: AddTaskArgs = decode_args(name, args)?;
            require_non_empty(name, "projectId", &args.project_id)?;
            require_non_empty(name, "title", &args.title)?;
            service
                .add_task(&args.project_id, &args.title)
                .map(|task| success(name, "Task added", "task", &task))
        }
        LIST_TASKS => {
            let args: ListTasksArgs = decode_args(name, args)?;
            require_non_empty(name, "projectId", &args.project_id)?;
            service
                .list_tasks(&args.project_id)
                .map(|tasks| success(name, "Tasks", "tasks", &tasks))
        }
        COMPLETE_TASK => {
            let args: CompleteTaskArgs = decode_args(name, args)?;
            require_non_empty(name, "projectId", &args.project_id)?;
            require_non_empty(name, "taskId", &args.task_id)?;
            service
                .complete_task(&args.project_id, &args.task_id)
                .map(|task| success(name, "Task completed", "task", &task))
        }
        other => return Err(ToolCallError::UnknownTool(other.to_string())),
    };

    match result {
        Ok(rendered) => rendered,
        Err(err) => Ok(failure(&err)),
    }
}

fn decode_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolCallError> {
    // Clients may send `null` or omit arguments for parameterless tools.
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|err| ToolCallError::InvalidArguments {
        tool: tool.to_string(),
        message: err.to_string(),
    })
}

fn require_non_empty(tool: &str, field: &str, value: &str) -> Result<(), ToolCallError> {
    if value.is_empty() {
        return Err(ToolCallError::InvalidArguments {
            tool: tool.to_string(),
            message: format!("`{field}` must contain at least 1 character"),
        });
    }
    Ok(())
}

fn success<T: Serialize>(
    tool: &str,
    label: &str,
    key: &str,
    payload: &T,
) -> Result<Value, ToolCallError> {
    let rendered = serde_json::to_value(payload).map_err(|err| ToolCallError::Internal {
        tool: tool.to_string(),
        message: err.to_string(),
    })?;
    Ok(json!({
        "content": [text_content(format!("{label}: {rendered}"))],
        "structuredContent": { key: rendered },
    }))
}

fn failure(err: &RepoError) -> Value {
    json!({
        "content": [text_content(format!("{}: {err}", err.code()))],
        "isError": true,
    })
}

#[cfg(test)]
mod tests {
    use super::{success, ToolCallError};
    use crate::jsonrpc::INTERNAL_ERROR;
    use serde::{Serialize, Serializer};

    struct Unrenderable;

    impl Serialize for Unrenderable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot render"))
        }
    }

    #[test]
    fn success_reports_serialization_failure_as_internal_error() {
        let err = success("create-project", "Project created", "project", &Unrenderable)
            .unwrap_err();
        assert!(matches!(err, ToolCallError::Internal { ref tool, .. } if tool == "create-project"));
        assert_eq!(err.rpc_code(), INTERNAL_ERROR);
        assert!(err.message().contains("cannot render"));
    }

    #[test]
    fn success_wraps_payload_in_text_and_structured_content() {
        let value = success("list-projects", "Projects", "projects", &vec!["a"]).unwrap();
        assert_eq!(value["structuredContent"]["projects"][0], "a");
        assert_eq!(value["content"][0]["text"], "Projects: [\"a\"]");
    }
}
