use std::time::Duration;

use annotator_protocol::catalog::InjectJsTool;
use annotator_protocol::{CallToolResult, HubError};
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(15);

#[async_trait]
impl AnnotatorTool for InjectJsTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let Some(code) = args.get("code").and_then(Value::as_str) else {
            let err = HubError::InvalidArguments { message: "code is required".to_string() };
            return CallToolResult::text(err.as_tool_error_text());
        };

        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };

        match super::invoke(&entry, "inject-js", serde_json::json!({ "code": code }), DEADLINE).await {
            Ok(value) => CallToolResult::text(serde_json::to_string_pretty(&value).unwrap_or_default()),
            Err(result) => result,
        }
    }
}
