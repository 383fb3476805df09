//! The tagged-variant envelope every RPC call resolves to: `{ok: true,
//! value}` or `{ok: false, error}` (`§9`, Design Notes: "a tagged-variant
//! envelope is the portable shape").

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HubError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorPayload {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retriable: Option<bool>,
}

impl From<&HubError> for RpcErrorPayload {
    fn from(err: &HubError) -> Self {
        Self { kind: err.kind().to_string(), message: err.to_string(), retriable: Some(err.is_retriable()) }
    }
}

/// Wire shape: `{"ok": true, "value": ...}` or `{"ok": false, "error":
/// {...}}`. Kept as a plain struct (rather than an internally tagged enum)
/// because `ok` is a JSON boolean, not a string discriminant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorPayload>,
}

impl Envelope {
    pub fn ok(value: Value) -> Self {
        Envelope { ok: true, value: Some(value), error: None }
    }

    pub fn err(error: &HubError) -> Self {
        Envelope { ok: false, value: None, error: Some(error.into()) }
    }

    pub fn into_result(self) -> Result<Value, RpcErrorPayload> {
        if self.ok {
            Ok(self.value.unwrap_or(Value::Null))
        } else {
            Err(self.error.expect("err envelope always carries an error payload"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn err_envelope_carries_kind_and_message() {
        let envelope = Envelope::err(&HubError::TransportClosed);
        match envelope.into_result() {
            Err(payload) => {
                assert_eq!(payload.kind, "transport-closed");
                assert_eq!(payload.retriable, Some(true));
            }
            Ok(_) => panic!("expected error envelope"),
        }
    }

    #[test]
    fn ok_envelope_round_trips_value() {
        let envelope = Envelope::ok(serde_json::json!({"a": 1}));
        assert_eq!(envelope.into_result().unwrap()["a"], 1);
    }
}
