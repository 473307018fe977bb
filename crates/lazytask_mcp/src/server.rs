//! MCP request dispatcher.
//!
//! # Responsibility
//! - Route JSON-RPC methods to tools, resources and prompts.
//! - Enforce the `initialize` handshake before serving other methods.
//!
//! # Invariants
//! - Notifications never produce a response.
//! - Every request with an `id` gets exactly one response.

use crate::jsonrpc::{
    json_rpc_error, json_rpc_response, JsonRpcRequest, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, SERVER_NOT_INITIALIZED,
};
use crate::{prompts, resources, tools};
use lazytask_core::{RepoError, StoreClient};
use log::{debug, info, warn};
use serde_json::{json, Value};
use std::time::Instant;

pub const SERVER_NAME: &str = "lazytask";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVER_INSTRUCTIONS: &str = "Project and task management server. Use it to create \
projects, add tasks, list tasks, complete tasks, and plan next steps.";

/// Protocol revisions this server can speak, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Stateful MCP server bound to one shared store client.
pub struct McpServer {
    store: StoreClient,
    initialized: bool,
}

impl McpServer {
    pub fn new(store: StoreClient) -> Self {
        Self {
            store,
            initialized: false,
        }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Parses one raw JSON line and dispatches it.
    pub fn handle_line(&mut self, line: &str) -> Option<Value> {
        let value = match serde_json::from_str::<Value>(line) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=rpc_parse module=mcp status=error error={err}");
                return Some(json_rpc_error(None, PARSE_ERROR, "Parse error"));
            }
        };
        if value.is_array() {
            return Some(json_rpc_error(
                None,
                INVALID_REQUEST,
                "Batch requests are not supported",
            ));
        }
        let id = value.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request),
            Err(err) => Some(json_rpc_error(
                id,
                INVALID_REQUEST,
                &format!("Invalid request: {err}"),
            )),
        }
    }

    /// Dispatches a decoded request. Returns `None` for notifications.
    pub fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let started_at = Instant::now();
        let method = request.method.clone();
        let notification = request.is_notification();

        let response = self.dispatch(request);

        debug!(
            "event=rpc_request module=mcp status=done method={method} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        if notification {
            return None;
        }
        response
    }

    fn dispatch(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let id = request.id.clone();
        let method = request.method.as_str();

        if method == "initialize" {
            self.initialized = true;
            return Some(json_rpc_response(id, initialize_result(request.params.as_ref())));
        }
        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }
        if method == "ping" {
            return Some(json_rpc_response(id, json!({})));
        }
        if method.starts_with("notifications/") {
            return None;
        }
        if !self.initialized {
            return Some(json_rpc_error(
                id,
                SERVER_NOT_INITIALIZED,
                "Server not initialized",
            ));
        }

        let params = request.params.unwrap_or_else(|| json!({}));
        let result = match method {
            "tools/list" => Ok(json!({ "tools": tools::tool_definitions() })),
            "tools/call" => self.tools_call(&params),
            "resources/list" => Ok(json!({ "resources": [] })),
            "resources/templates/list" => {
                Ok(json!({ "resourceTemplates": resources::resource_templates() }))
            }
            "resources/read" => self.resources_read(&params),
            "prompts/list" => Ok(json!({ "prompts": prompts::prompt_definitions() })),
            "prompts/get" => self.prompts_get(&params),
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {other}"))),
        };

        Some(match result {
            Ok(value) => json_rpc_response(id, value),
            Err((code, message)) => json_rpc_error(id, code, &message),
        })
    }

    fn tools_call(&self, params: &Value) -> Result<Value, (i64, String)> {
        let name = string_param(params, "name")?;
        let args = params.get("arguments").cloned().unwrap_or(Value::Null);

        let started_at = Instant::now();
        let result = tools::call_tool(&self.store, name, args)
            .map_err(|err| (err.rpc_code(), err.message()))?;
        let is_error = result
            .get("isError")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        info!(
            "event=tool_call module=mcp status={} tool={name} duration_ms={}",
            if is_error { "error" } else { "ok" },
            started_at.elapsed().as_millis()
        );
        Ok(result)
    }

    fn resources_read(&self, params: &Value) -> Result<Value, (i64, String)> {
        let uri = string_param(params, "uri")?;
        let project_id = resources::parse_tasks_uri(uri)
            .ok_or_else(|| (INVALID_PARAMS, format!("Unknown resource: {uri}")))?;
        resources::read_tasks_resource(&self.store, uri, project_id).map_err(repo_error)
    }

    fn prompts_get(&self, params: &Value) -> Result<Value, (i64, String)> {
        let name = string_param(params, "name")?;
        if name != prompts::NEXT_STEPS {
            return Err((INVALID_PARAMS, format!("Unknown prompt: {name}")));
        }
        let project_id = params
            .get("arguments")
            .and_then(|args| args.get("projectId"))
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| (INVALID_PARAMS, "projectId is required".to_string()))?;
        prompts::next_steps_prompt(&self.store, project_id).map_err(repo_error)
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    let requested = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str);
    let version = requested
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);
    json!({
        "protocolVersion": version,
        "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        "capabilities": { "tools": {}, "resources": {}, "prompts": {} },
        "instructions": SERVER_INSTRUCTIONS,
    })
}

fn string_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, (i64, String)> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| (INVALID_PARAMS, format!("{key} must be a string")))
}

fn repo_error(err: RepoError) -> (i64, String) {
    let code = match &err {
        RepoError::InvalidInput(_) | RepoError::NotFound { .. } | RepoError::Conflict { .. } => {
            INVALID_PARAMS
        }
        RepoError::StoreUnavailable(_) | RepoError::Store(_) | RepoError::InvalidData(_) => {
            INTERNAL_ERROR
        }
    };
    (code, err.to_string())
}
