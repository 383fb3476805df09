use std::time::Duration;

use annotator_protocol::catalog::CaptureScreenshotTool;
use annotator_protocol::{CallToolResult, HubError};
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(30);

#[async_trait]
impl AnnotatorTool for CaptureScreenshotTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let quality = args.get("quality").and_then(Value::as_f64).unwrap_or(0.9);
        if !(0.0..=1.0).contains(&quality) {
            let err = HubError::InvalidArguments { message: "quality must be between 0 and 1".to_string() };
            return CallToolResult::text(err.as_tool_error_text());
        }

        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };

        let procedure_args = serde_json::json!({
            "selector": args.get("selector"),
            "quality": quality,
        });

        let payload = match super::invoke(&entry, "capture-screenshot", procedure_args, DEADLINE).await {
            Ok(value) => value,
            Err(result) => return result,
        };

        let Some(base64_payload) = payload.as_str() else {
            return CallToolResult::text("Screenshot failed: browser returned a non-string payload");
        };

        match annotator_screenshot::save(base64_payload) {
            Ok(path) => CallToolResult::text(path.display().to_string()),
            Err(err) => CallToolResult::text(err.as_tool_message()),
        }
    }
}
