//! The MCP Tool Surface (`§4.5`): a fixed catalog of tools, each a thin
//! façade resolving a session and invoking one browser-side procedure.

mod capture_screenshot;
mod clear_feedback;
mod get_console;
mod get_feedback;
mod get_page_context;
mod inject_css;
mod inject_js;
mod list_sessions;
mod select_feedback;

use std::sync::Arc;
use std::time::Duration;

use annotator_protocol::catalog::{
    CaptureScreenshotTool, ClearFeedbackTool, GetConsoleTool, GetFeedbackTool, GetPageContextTool, InjectCssTool,
    InjectJsTool, ListSessionsTool, SelectFeedbackTool,
};
use annotator_protocol::{CallToolResult, SessionId, ToolDefinition};
use annotator_session::SessionEntry;
use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;

/// Every tool resolves a session, invokes a browser procedure, and renders
/// the outcome as prose; this trait adds only the `call` leg on top of
/// `ToolDefinition`'s metadata.
#[async_trait]
pub trait AnnotatorTool: ToolDefinition + Send + Sync {
    async fn call(&self, state: &AppState, args: Value) -> CallToolResult;
}

pub fn parse_session_id(args: &Value) -> Option<SessionId> {
    args.get("sessionId").and_then(Value::as_str).and_then(SessionId::parse)
}

/// Resolve the target session, or format the resolution failure as tool
/// text (not an MCP error — `§4.5`).
pub fn resolve(state: &AppState, args: &Value) -> Result<Arc<SessionEntry>, CallToolResult> {
    state.registry.resolve(parse_session_id(args)).map_err(|err| CallToolResult::text(err.as_resolution_text()))
}

/// Invoke a browser procedure through a resolved session's RPC peer and
/// render success or failure the way `§4.5`/`§7` specify.
pub async fn invoke(
    entry: &Arc<SessionEntry>,
    procedure: &str,
    args: Value,
    deadline: Duration,
) -> Result<Value, CallToolResult> {
    entry.peer.call(procedure, args, deadline).await.map_err(|err| CallToolResult::text(err.as_tool_error_text()))
}

pub fn all_tools() -> Vec<Arc<dyn AnnotatorTool>> {
    vec![
        Arc::new(ListSessionsTool),
        Arc::new(GetPageContextTool),
        Arc::new(SelectFeedbackTool),
        Arc::new(GetFeedbackTool),
        Arc::new(CaptureScreenshotTool),
        Arc::new(ClearFeedbackTool),
        Arc::new(InjectCssTool),
        Arc::new(InjectJsTool),
        Arc::new(GetConsoleTool),
    ]
}
