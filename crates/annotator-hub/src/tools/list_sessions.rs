use annotator_protocol::catalog::ListSessionsTool;
use annotator_protocol::CallToolResult;
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

use super::AnnotatorTool;

#[async_trait]
impl AnnotatorTool for ListSessionsTool {
    async fn call(&self, state: &AppState, _args: Value) -> CallToolResult {
        let sessions = state.registry.list();
        if sessions.is_empty() {
            return CallToolResult::text("No browser sessions connected. Add the annotator script to your webpage.");
        }
        CallToolResult::text(serde_json::to_string_pretty(&sessions).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_registry_returns_fixed_message() {
        let state = AppState::new();
        let result = ListSessionsTool.call(&state, Value::Null).await;
        match &result.content[0] {
            annotator_protocol::ToolResult::Text { text } => {
                assert_eq!(text, "No browser sessions connected. Add the annotator script to your webpage.");
            }
        }
    }

    #[tokio::test]
    async fn is_a_pure_read() {
        let state = AppState::new();
        let first = ListSessionsTool.call(&state, Value::Null).await;
        let second = ListSessionsTool.call(&state, Value::Null).await;
        let text_of = |r: &CallToolResult| match &r.content[0] {
            annotator_protocol::ToolResult::Text { text } => text.clone(),
        };
        assert_eq!(text_of(&first), text_of(&second));
    }
}
