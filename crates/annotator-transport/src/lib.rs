//! The Transport Adapter: a bidirectional, message-oriented duplex channel
//! abstraction, realised over WebSocket, shared by browser sessions, bridge
//! attachments, and the bridge's outbound connection to the hub.

pub mod frame;
pub mod transport;
pub mod websocket;

pub use frame::Frame;
pub use transport::{
    ClientType, ConnectedFlag, ConnectionId, FrameReceiver, IncomingCall, Transport, TransportError,
    TransportResult,
};
pub use websocket::WebSocketTransport;
