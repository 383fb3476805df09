//! Re-exported from `annotator-protocol` so the HTTP front and the bridge's
//! stdio front share one JSON-RPC envelope.

pub use annotator_protocol::jsonrpc::{error_codes, JsonRpcErrorObject, JsonRpcRequest, JsonRpcResponse};
