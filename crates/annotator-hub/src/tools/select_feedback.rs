use std::time::Duration;

use annotator_protocol::catalog::SelectFeedbackTool;
use annotator_protocol::{CallToolResult, HubError};
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(10);

#[async_trait]
impl AnnotatorTool for SelectFeedbackTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let mode = args.get("mode").and_then(Value::as_str).unwrap_or_default();
        if mode == "selector" && args.get("selector").and_then(Value::as_str).is_none_or(str::is_empty) {
            let err = HubError::InvalidArguments {
                message: "Feedback selection failed: selector is required in selector mode".to_string(),
            };
            return CallToolResult::text(err.as_tool_error_text());
        }

        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };

        let procedure_args = serde_json::json!({
            "mode": mode,
            "selector": args.get("selector"),
            "selectorType": args.get("selectorType").and_then(Value::as_str).unwrap_or("css"),
        });

        match super::invoke(&entry, "trigger-selection", procedure_args, DEADLINE).await {
            Ok(_) => CallToolResult::text("Feedback selection started."),
            Err(result) => result,
        }
    }
}
