use std::time::Duration;

use annotator_protocol::catalog::ClearFeedbackTool;
use annotator_protocol::CallToolResult;
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(10);

#[async_trait]
impl AnnotatorTool for ClearFeedbackTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };
        match super::invoke(&entry, "clear-selection", Value::Null, DEADLINE).await {
            Ok(_) => CallToolResult::text("Feedback cleared."),
            Err(result) => result,
        }
    }
}
