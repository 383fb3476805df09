use std::time::Duration;

use annotator_protocol::catalog::GetConsoleTool;
use annotator_protocol::CallToolResult;
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(15);

#[async_trait]
impl AnnotatorTool for GetConsoleTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };

        let clear = args.get("clear").and_then(Value::as_bool).unwrap_or(false);
        let log = match super::invoke(&entry, "get-console", serde_json::json!({ "clear": clear }), DEADLINE).await {
            Ok(value) => value,
            Err(result) => return result,
        };

        match log.as_array() {
            Some(entries) if entries.is_empty() => CallToolResult::text("No console output captured."),
            Some(_) => CallToolResult::text(serde_json::to_string_pretty(&log).unwrap_or_default()),
            None => CallToolResult::text("No console output captured."),
        }
    }
}
