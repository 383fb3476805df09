//! A minimal JSON-RPC 2.0 envelope for the MCP tool surface. Scoped to what
//! `initialize`/`tools/list`/`tools/call`/`ping` need; not a general-purpose
//! JSON-RPC server. Shared by the hub's HTTP front and the bridge's stdio
//! front so the two can never drift on error codes or response shape.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self { jsonrpc: "2.0", id, result: None, error: Some(JsonRpcErrorObject { code, message: message.into() }) }
    }
}

/// The method-routing skeleton every MCP front shares: `initialize`, `ping`,
/// `notifications/initialized`, and unknown-method handling are identical
/// everywhere, so they live here once. `tools/list` and `tools/call` are
/// supplied by the caller because they reach the tool catalog differently —
/// the hub calls tools in-process, the bridge forwards `tools/call` over the
/// wire to the hub — but both fronts route through this same function, so
/// the method names, error codes, and envelope shape cannot drift apart.
pub async fn dispatch_core<L, ListFut, C, CallFut>(
    server_name: &str,
    server_version: &str,
    request: JsonRpcRequest,
    list_tools: L,
    call_tool: C,
) -> JsonRpcResponse
where
    L: FnOnce() -> ListFut,
    ListFut: Future<Output = Value>,
    C: FnOnce(Value, Option<Value>) -> CallFut,
    CallFut: Future<Output = JsonRpcResponse>,
{
    let id = request.id.clone().unwrap_or(Value::Null);

    match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": "2025-06-18",
                "capabilities": { "tools": {} },
                "serverInfo": { "name": server_name, "version": server_version },
            }),
        ),
        "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
        "notifications/initialized" => JsonRpcResponse::success(id, Value::Null),
        "tools/list" => JsonRpcResponse::success(id, serde_json::json!({ "tools": list_tools().await })),
        "tools/call" => call_tool(id, request.params).await,
        other => JsonRpcResponse::error(id, error_codes::METHOD_NOT_FOUND, format!("Method not found: {other}")),
    }
}

/// Pull `name`/`arguments` out of a `tools/call` request's `params`, the way
/// every front needs to before it can resolve and invoke the named tool.
pub fn tool_call_name_and_args(params: Option<Value>) -> Result<(String, Value), JsonRpcErrorObject> {
    let params = params.unwrap_or(Value::Null);
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return Err(JsonRpcErrorObject {
            code: error_codes::INVALID_PARAMS,
            message: "tools/call requires a `name`".to_string(),
        });
    };
    let arguments = params.get("arguments").cloned().unwrap_or_else(|| Value::Object(Default::default()));
    Ok((name.to_string(), arguments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_reports_the_given_name_and_version() {
        let request = JsonRpcRequest { id: Some(serde_json::json!(1)), method: "initialize".to_string(), params: None };
        let response =
            dispatch_core("annotator-test", "9.9.9", request, || async { Value::Null }, |id, _params| async move {
                JsonRpcResponse::success(id, Value::Null)
            })
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "annotator-test");
        assert_eq!(result["serverInfo"]["version"], "9.9.9");
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let request = JsonRpcRequest { id: Some(serde_json::json!(1)), method: "bogus".to_string(), params: None };
        let response =
            dispatch_core("annotator-test", "0.0.0", request, || async { Value::Null }, |id, _params| async move {
                JsonRpcResponse::success(id, Value::Null)
            })
            .await;
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn tool_call_without_a_name_is_invalid_params() {
        let err = tool_call_name_and_args(Some(serde_json::json!({ "arguments": {} }))).unwrap_err();
        assert_eq!(err.code, error_codes::INVALID_PARAMS);
    }

    #[test]
    fn tool_call_defaults_missing_arguments_to_an_empty_object() {
        let (name, arguments) = tool_call_name_and_args(Some(serde_json::json!({ "name": "x" }))).unwrap();
        assert_eq!(name, "x");
        assert_eq!(arguments, serde_json::json!({}));
    }
}
