//! Store health report shared by the `health` command.

use lazytask_core::StoreClient;
use log::warn;
use serde_json::{json, Value};

/// Pings the store and renders `{"ok": true}` or `{"ok": false, "error": …}`.
pub fn health_report(store: &StoreClient) -> Value {
    match store.health_check() {
        Ok(()) => json!({ "ok": true }),
        Err(err) => {
            warn!(
                "event=health_check module=mcp status=error backend={} error={err}",
                store.url().backend_label()
            );
            json!({ "ok": false, "error": err.to_string() })
        }
    }
}

/// Whether a report produced by `health_report` is healthy.
pub fn is_healthy(report: &Value) -> bool {
    report.get("ok").and_then(Value::as_bool).unwrap_or(false)
}
