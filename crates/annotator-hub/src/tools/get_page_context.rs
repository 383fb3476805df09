use std::time::Duration;

use annotator_protocol::catalog::GetPageContextTool;
use annotator_protocol::CallToolResult;
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::{resolve, AnnotatorTool};

const DEADLINE: Duration = Duration::from_secs(10);

#[async_trait]
impl AnnotatorTool for GetPageContextTool {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult {
        let entry = match resolve(state, &args) {
            Ok(entry) => entry,
            Err(result) => return result,
        };
        match super::invoke(&entry, "get-page-context", Value::Null, DEADLINE).await {
            Ok(value) => CallToolResult::text(serde_json::to_string_pretty(&value).unwrap_or_default()),
            Err(result) => result,
        }
    }
}
