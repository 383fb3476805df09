//! The session-brokering RPC hub: session registry, RPC routing, and the MCP
//! tool surface, fronted by one HTTP server that also terminates browser and
//! bridge WebSocket connections.

pub mod config;
pub mod cors;
pub mod mcp;
pub mod server;
pub mod state;
pub mod tools;

pub use config::{CliArgs, ConfigError, HubConfig};
pub use state::AppState;
