//! The bridge's own MCP front: it answers `initialize`/`tools/list`/`ping`
//! locally from the same static catalog the hub serves, and forwards
//! `tools/call` over the wire as the tool-specific `mcp:<event>` (`§4.5`,
//! `§4.6`). The method-routing skeleton comes from
//! `annotator_protocol::jsonrpc::dispatch_core`, shared with the hub's own
//! front, so the two can never drift on method names or envelope shape;
//! only `tools/call`'s forwarding-over-the-wire is bridge-specific.

use annotator_protocol::catalog::{all_tool_descriptors, bridge_event_for_tool, deadline_for_tool};
use annotator_protocol::jsonrpc::{dispatch_core, error_codes, tool_call_name_and_args, JsonRpcRequest, JsonRpcResponse};
use annotator_protocol::{CallToolResult, HubError};
use annotator_rpc::RpcPeer;
use serde_json::Value;
use tokio::sync::Notify;

/// `retry_now` is the immediate-reconnect trigger (`§4.6`): a tool call that
/// observes the transport down fires it, cutting short whatever backoff
/// sleep the outer reconnect loop is currently waiting out.
pub async fn dispatch(peer: &RpcPeer, request: JsonRpcRequest, retry_now: &Notify) -> JsonRpcResponse {
    dispatch_core(
        "annotator-bridge",
        env!("CARGO_PKG_VERSION"),
        request,
        || async { serde_json::json!(all_tool_descriptors()) },
        |id, params| handle_tools_call(peer, id, params, retry_now),
    )
    .await
}

async fn handle_tools_call(peer: &RpcPeer, id: Value, params: Option<Value>, retry_now: &Notify) -> JsonRpcResponse {
    let (name, arguments) = match tool_call_name_and_args(params) {
        Ok(parsed) => parsed,
        Err(err) => return JsonRpcResponse::error(id, err.code, err.message),
    };
    let Some(event) = bridge_event_for_tool(&name) else {
        return JsonRpcResponse::error(id, error_codes::METHOD_NOT_FOUND, format!("Tool not found: {name}"));
    };

    let session_id = arguments.get("sessionId").cloned().unwrap_or(Value::Null);
    let mut tool_args = arguments;
    if let Value::Object(ref mut map) = tool_args {
        map.remove("sessionId");
    }

    let payload = serde_json::json!({ "sessionId": session_id, "args": tool_args });
    let result = match peer.call(&event, payload, deadline_for_tool(&name)).await {
        Ok(value) => parse_outcome(value),
        Err(HubError::TransportClosed) => {
            retry_now.notify_one();
            CallToolResult::error("Not connected to server. Reconnecting...")
        }
        Err(err) => CallToolResult::error(err.as_tool_error_text()),
    };
    JsonRpcResponse::success(id, serde_json::to_value(result).unwrap_or(Value::Null))
}

/// Parse the hub's `{success, data?, error?}` ack payload (`§4.4`/`§6`) back
/// into the `CallToolResult` the hub already formatted.
fn parse_outcome(value: Value) -> CallToolResult {
    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        let message = value.get("error").and_then(Value::as_str).unwrap_or("unknown error");
        return CallToolResult::error(format!("Error: {message}"));
    }
    value
        .get("data")
        .cloned()
        .and_then(|data| serde_json::from_value::<CallToolResult>(data).ok())
        .unwrap_or_else(|| CallToolResult::error("Error: malformed response from hub"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_outcome_passes_through_the_formatted_result() {
        let outcome = serde_json::json!({
            "success": true,
            "data": { "content": [{"type": "text", "text": "hello"}] },
        });
        let result = parse_outcome(outcome);
        match &result.content[0] {
            annotator_protocol::ToolResult::Text { text } => assert_eq!(text, "hello"),
        }
    }

    #[test]
    fn failure_outcome_is_prefixed() {
        let outcome = serde_json::json!({ "success": false, "error": "boom" });
        let result = parse_outcome(outcome);
        match &result.content[0] {
            annotator_protocol::ToolResult::Text { text } => assert!(text.starts_with("Error: boom")),
        }
    }
}
