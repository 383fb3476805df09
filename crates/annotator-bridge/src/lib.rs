//! Stdio-to-WebSocket bridge: lets an MCP host that only speaks stdio reach
//! a remote annotator hub's tool surface, reconnecting across hub restarts.

pub mod cli;
pub mod mcp;
pub mod reconnect;
pub mod stdio;

pub use cli::{BridgeConfig, CliArgs, Command, ConfigError};
