//! CLI and environment configuration for the bridge binary (`§6`).

use clap::{Parser, Subcommand};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "annotator-bridge", version, about = "Stdio MCP bridge to a remote annotator hub")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the stdio MCP bridge against a remote hub.
    Mcp {
        /// HTTP(S) address of the hub to bridge to. Falls back to
        /// `AI_ANNOTATOR_SERVER` if omitted.
        #[arg(long)]
        server: Option<String>,

        /// Raise the log level from info to debug. Bridge logs go to
        /// stderr; stdout is reserved for the MCP stdio transport.
        #[arg(long)]
        verbose: bool,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("--server is required (or set AI_ANNOTATOR_SERVER)")]
    MissingServer,
    #[error("--server is not a valid URL: {0}")]
    InvalidServer(String),
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub socket_url: String,
    pub verbose: bool,
}

impl BridgeConfig {
    pub fn resolve(args: CliArgs) -> Result<Self, ConfigError> {
        let Command::Mcp { server, verbose } = args.command;

        let raw = server.or_else(|| std::env::var("AI_ANNOTATOR_SERVER").ok()).ok_or(ConfigError::MissingServer)?;

        let mut url = Url::parse(&raw).map_err(|e| ConfigError::InvalidServer(e.to_string()))?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            "ws" | "wss" => url.scheme(),
            other => return Err(ConfigError::InvalidServer(format!("unsupported scheme `{other}`"))),
        };
        url.set_scheme(scheme).map_err(|()| ConfigError::InvalidServer(raw.clone()))?;
        url.set_path("/socket");
        url.set_query(Some("clientType=bridge"));

        Ok(Self { socket_url: url.to_string(), verbose })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(server: Option<&str>) -> CliArgs {
        CliArgs { command: Command::Mcp { server: server.map(String::from), verbose: false } }
    }

    #[test]
    fn missing_server_is_rejected() {
        std::env::remove_var("AI_ANNOTATOR_SERVER");
        assert!(matches!(BridgeConfig::resolve(args(None)), Err(ConfigError::MissingServer)));
    }

    #[test]
    fn http_server_becomes_a_ws_socket_url() {
        let config = BridgeConfig::resolve(args(Some("http://localhost:7318"))).unwrap();
        assert_eq!(config.socket_url, "ws://localhost:7318/socket?clientType=bridge");
    }

    #[test]
    fn https_server_becomes_a_wss_socket_url() {
        let config = BridgeConfig::resolve(args(Some("https://hub.example.com"))).unwrap();
        assert_eq!(config.socket_url, "wss://hub.example.com/socket?clientType=bridge");
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(matches!(BridgeConfig::resolve(args(Some("not a url"))), Err(ConfigError::InvalidServer(_))));
    }
}
