use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::frame::Frame;

/// Opaque identifier for one transport connection. Distinct from a
/// `SessionId`: a connection exists from accept to close, a session is the
/// registry's view of a connected browser and is allocated separately on
/// top of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The advertised kind of an inbound connection, decided at accept time by
/// the hub server (`§4.4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    Browser,
    Bridge,
}

impl ClientType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "browser" => Some(ClientType::Browser),
            "bridge" => Some(ClientType::Bridge),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("websocket error: {0}")]
    WebSocket(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Frames delivered to whoever is reading this connection: either the
/// server-side dispatcher classifying a fresh connection, or the RPC engine
/// matching inbound events and acks against its tables.
pub type FrameReceiver = tokio::sync::mpsc::UnboundedReceiver<Frame>;

/// Contract for a bidirectional, message-oriented duplex channel to one
/// peer (`§4.1`). Used identically for browser sessions, bridge
/// attachments, and outbound bridge-to-hub connections; the RPC engine
/// builds request/response correlation on top without knowing which
/// concrete transport it is talking to.
#[async_trait]
pub trait Transport: Send + Sync {
    fn connection_id(&self) -> ConnectionId;

    fn client_type(&self) -> ClientType;

    /// Whether the connection is still live. Once false it never becomes
    /// true again; the corresponding RPC peer must be disposed.
    fn is_connected(&self) -> bool;

    /// Send a frame to the peer. `Frame::Event { ack_id: Some(_), .. }`
    /// forms one half of a request; the peer answers, if at all, with a
    /// `Frame::Ack` carrying the same id.
    async fn send_frame(&self, frame: Frame) -> TransportResult<()>;

    /// Terminate the connection from this side.
    async fn close(&self);
}

/// Shared connected-state flag, used by every concrete transport so
/// `is_connected()` reflects the background I/O task's view without a lock.
#[derive(Debug, Default)]
pub struct ConnectedFlag(AtomicBool);

impl ConnectedFlag {
    pub fn new_connected() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A raw inbound payload for an RPC-level event handler, paired with a way
/// to deliver an ack back through the emitting transport. Built by the RPC
/// engine layer from `FrameReceiver` output; transports never construct
/// this directly.
pub struct IncomingCall {
    pub event: String,
    pub args: Value,
    pub ack_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn client_type_parses_known_values_only() {
        assert_eq!(ClientType::parse("browser"), Some(ClientType::Browser));
        assert_eq!(ClientType::parse("bridge"), Some(ClientType::Bridge));
        assert_eq!(ClientType::parse("robot"), None);
    }
}
