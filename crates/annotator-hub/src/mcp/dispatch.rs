use std::sync::Arc;

use annotator_protocol::jsonrpc::{dispatch_core, error_codes, tool_call_name_and_args};
use annotator_protocol::ToolDefinition;
use serde_json::Value;

use crate::state::AppState;
use crate::tools::AnnotatorTool;

use super::jsonrpc::{JsonRpcRequest, JsonRpcResponse};

/// Route one MCP JSON-RPC request to its handler. The method-routing
/// skeleton (`initialize`/`ping`/`notifications/initialized`/unknown
/// method) comes from `annotator_protocol::jsonrpc::dispatch_core`, shared
/// with the bridge's own front; `tools/list` and `tools/call` are supplied
/// here because this front reaches tools in-process.
pub async fn dispatch(tools: &[Arc<dyn AnnotatorTool>], state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    dispatch_core(
        "annotator-hub",
        env!("CARGO_PKG_VERSION"),
        request,
        || async { serde_json::json!(tools.iter().map(|tool| tool.descriptor()).collect::<Vec<_>>()) },
        |id, params| handle_tools_call(tools, state, id, params),
    )
    .await
}

async fn handle_tools_call(
    tools: &[Arc<dyn AnnotatorTool>],
    state: &AppState,
    id: Value,
    params: Option<Value>,
) -> JsonRpcResponse {
    let (name, arguments) = match tool_call_name_and_args(params) {
        Ok(parsed) => parsed,
        Err(err) => return JsonRpcResponse::error(id, err.code, err.message),
    };
    let Some(tool) = tools.iter().find(|tool| tool.name() == name) else {
        return JsonRpcResponse::error(id, error_codes::METHOD_NOT_FOUND, format!("Tool not found: {name}"));
    };
    let result = tool.call(state, arguments).await;
    JsonRpcResponse::success(id, serde_json::to_value(result).unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::all_tools;

    #[tokio::test]
    async fn tools_list_returns_all_nine_tools() {
        let tools = all_tools();
        let state = AppState::new();
        let request = JsonRpcRequest { id: Some(serde_json::json!(1)), method: "tools/list".to_string(), params: None };
        let response = dispatch(&tools, &state, request).await;
        let result = response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn unknown_tool_name_is_method_not_found() {
        let tools = all_tools();
        let state = AppState::new();
        let request = JsonRpcRequest {
            id: Some(serde_json::json!(1)),
            method: "tools/call".to_string(),
            params: Some(serde_json::json!({ "name": "not_a_real_tool", "arguments": {} })),
        };
        let response = dispatch(&tools, &state, request).await;
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let tools = all_tools();
        let state = AppState::new();
        let request = JsonRpcRequest { id: Some(serde_json::json!(1)), method: "bogus".to_string(), params: None };
        let response = dispatch(&tools, &state, request).await;
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }
}
