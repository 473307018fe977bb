//! Newline-delimited JSON-RPC transport over stdin/stdout.

use crate::server::McpServer;
use log::info;
use serde_json::Value;
use std::io::{BufRead, Write};

/// Serves requests from `input` until EOF, writing one response per line.
pub fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    input: R,
    output: &mut W,
) -> std::io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(response) = server.handle_line(&line) {
            write_message(output, &response)?;
        }
    }
    Ok(())
}

/// Runs the server on the process stdio streams.
pub fn run_stdio(server: &mut McpServer) -> std::io::Result<()> {
    info!("event=mcp_stdio module=mcp status=start");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    let result = serve(server, stdin.lock(), &mut stdout);
    info!("event=mcp_stdio module=mcp status=stop");
    result
}

fn write_message<W: Write>(output: &mut W, message: &Value) -> std::io::Result<()> {
    serde_json::to_writer(&mut *output, message)?;
    output.write_all(b"\n")?;
    output.flush()
}
