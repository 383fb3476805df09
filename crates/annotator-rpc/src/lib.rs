//! The RPC Engine: request/response correlation with per-call deadlines on
//! top of a `Transport`, usable from either side of the connection.

pub mod engine;

pub use engine::{Handler, RpcPeer};
