//! MCP (Model Context Protocol) surface for LazyTask.
//!
//! # Responsibility
//! - Expose project/task operations as MCP tools, a task resource template
//!   and a planning prompt.
//! - Keep protocol shaping out of `lazytask_core`.

pub mod health;
pub mod jsonrpc;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod stdio;
pub mod tools;

pub use health::{health_report, is_healthy};
pub use jsonrpc::JsonRpcRequest;
pub use server::McpServer;
pub use stdio::{run_stdio, serve};
