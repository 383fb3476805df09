//! The MCP HTTP front: JSON-RPC over a single `/mcp` endpoint, session-keyed
//! by the `Mcp-Session-Id` header (resolved Open Question (i) in the full
//! specification).

mod dispatch;
mod jsonrpc;
mod session;

pub use dispatch::dispatch;
pub use jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse};
pub use session::McpSessionStore;

use std::sync::Arc;

use serde_json::Value;

use crate::state::AppState;
use crate::tools::AnnotatorTool;

pub const SESSION_HEADER: &str = "mcp-session-id";

/// The outcome of handling one `/mcp` HTTP request: the JSON-RPC response
/// body plus the session id the caller should see on the response header (a
/// freshly issued one for `initialize`, otherwise whatever it sent).
pub struct McpExchange {
    pub response: JsonRpcResponse,
    pub session_id: String,
}

/// Handle one `/mcp` HTTP request body against the given (possibly absent)
/// `Mcp-Session-Id` header value.
///
/// `initialize` with no header mints a new MCP session id. Any other method
/// with an unknown or missing header is still dispatched (tool calls do not
/// require a prior `initialize` round trip over HTTP), but the store only
/// remembers ids that completed `initialize` so a caller can be told to
/// re-initialize if that distinction ever matters upstream.
pub async fn handle_request(
    store: &McpSessionStore,
    tools: &[Arc<dyn AnnotatorTool>],
    state: &AppState,
    incoming_session_id: Option<&str>,
    body: &[u8],
) -> McpExchange {
    let session_id = incoming_session_id.map(str::to_string).unwrap_or_else(|| store.issue_id());

    let request: JsonRpcRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(err) => {
            return McpExchange {
                response: JsonRpcResponse::error(Value::Null, error_codes::PARSE_ERROR, err.to_string()),
                session_id,
            }
        }
    };

    if request.method == "initialize" {
        store.mark_initialized(&session_id);
    }

    let response = dispatch(tools, state, request).await;
    McpExchange { response, session_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::all_tools;

    #[tokio::test]
    async fn initialize_without_header_mints_a_fresh_session_id() {
        let store = McpSessionStore::new();
        let tools = all_tools();
        let state = AppState::new();
        let body = br#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#;

        let exchange = handle_request(&store, &tools, &state, None, body).await;

        assert!(store.is_initialized(&exchange.session_id));
        assert!(exchange.response.error.is_none());
    }

    #[tokio::test]
    async fn tools_call_reuses_the_caller_supplied_session_id() {
        let store = McpSessionStore::new();
        let tools = all_tools();
        let state = AppState::new();
        let body = br#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#;

        let exchange = handle_request(&store, &tools, &state, Some("caller-chosen-id"), body).await;

        assert_eq!(exchange.session_id, "caller-chosen-id");
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let store = McpSessionStore::new();
        let tools = all_tools();
        let state = AppState::new();

        let exchange = handle_request(&store, &tools, &state, None, b"not json").await;

        assert_eq!(exchange.response.error.unwrap().code, error_codes::PARSE_ERROR);
    }
}
