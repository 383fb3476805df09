use std::time::Duration;

use annotator_protocol::catalog::InjectCssTool;
use annotator_protocol::{CallToolResult, HubError};
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(10);

#[async_trait]
impl AnnotatorTool for InjectCssTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let Some(css) = args.get("css").and_then(Value::as_str) else {
            let err = HubError::InvalidArguments { message: "css is required".to_string() };
            return CallToolResult::text(err.as_tool_error_text());
        };

        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };

        match super::invoke(&entry, "inject-css", serde_json::json!({ "css": css }), DEADLINE).await {
            Ok(_) => CallToolResult::text("CSS injected."),
            Err(result) => result,
        }
    }
}
