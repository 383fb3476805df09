//! Wire representation of transport events and their acknowledgements.
//!
//! Every message on the socket is one `Frame`: either a named event carrying
//! positional arguments and an optional correlation id for the reply, or the
//! reply itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Frame {
    Event {
        event: String,
        args: Value,
        #[serde(rename = "ackId", skip_serializing_if = "Option::is_none")]
        ack_id: Option<u64>,
    },
    Ack {
        #[serde(rename = "ackId")]
        ack_id: u64,
        value: Value,
    },
}

impl Frame {
    pub fn event(event: impl Into<String>, args: Value, ack_id: Option<u64>) -> Self {
        Frame::Event { event: event.into(), args, ack_id }
    }

    pub fn ack(ack_id: u64, value: Value) -> Self {
        Frame::Ack { ack_id, value }
    }

    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_text(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_frame_round_trips() {
        let frame = Frame::event("page-context-changed", serde_json::json!({"url": "x"}), Some(7));
        let text = frame.to_text().unwrap();
        let back = Frame::from_text(&text).unwrap();
        match back {
            Frame::Event { event, ack_id, .. } => {
                assert_eq!(event, "page-context-changed");
                assert_eq!(ack_id, Some(7));
            }
            Frame::Ack { .. } => panic!("expected event frame"),
        }
    }

    #[test]
    fn ack_frame_round_trips() {
        let frame = Frame::ack(7, serde_json::json!({"ok": true}));
        let text = frame.to_text().unwrap();
        let back = Frame::from_text(&text).unwrap();
        assert!(matches!(back, Frame::Ack { ack_id: 7, .. }));
    }
}
