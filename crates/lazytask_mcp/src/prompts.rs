//! `next-steps` planning prompt.

use crate::jsonrpc::text_content;
use lazytask_core::{BoardService, RepoResult, StoreClient};
use serde_json::{json, Value};

pub const NEXT_STEPS: &str = "next-steps";

pub fn prompt_definitions() -> Vec<Value> {
    vec![json!({
        "name": NEXT_STEPS,
        "title": "Plan Next Steps",
        "description": "Helps the model plan next steps for a project",
        "arguments": [
            { "name": "projectId", "description": "Project id", "required": true }
        ],
    })]
}

/// Builds the `prompts/get` result for `next-steps`.
pub fn next_steps_prompt(store: &StoreClient, project_id: &str) -> RepoResult<Value> {
    let text = BoardService::for_store(store).plan_next_steps(project_id)?;
    Ok(json!({
        "description": "Plan next steps for a project",
        "messages": [
            { "role": "user", "content": text_content(text) }
        ],
    }))
}
