//! CLI and environment configuration for the hub binary (`§6`).

use clap::Parser;
use url::Url;

const DEFAULT_PORT: u16 = 7318;

#[derive(Debug, Parser)]
#[command(name = "annotator-hub", version, about = "Session-brokering RPC hub for the annotation toolbar")]
pub struct CliArgs {
    /// Port to bind (1..65535). Overridden by PORT/INSPECTOR_PORT if set.
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address: a loopback variant or 0.0.0.0 / ::.
    #[arg(long, default_value = "127.0.0.1")]
    pub listen: String,

    /// Public URL advertised in the toolbar script. Defaults to
    /// `http://<listen>:<port>`.
    #[arg(long = "public-address")]
    pub public_address: Option<String>,

    /// Raise the log level from info to debug.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(String),
    #[error("listen address `{0}` is not an accepted loopback or wildcard address")]
    InvalidListenAddress(String),
    #[error("--public-address is not a valid URL: {0}")]
    InvalidPublicAddress(String),
}

/// The fully resolved, validated configuration the hub server runs with.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub port: u16,
    pub listen: String,
    pub public_address: String,
    pub verbose: bool,
}

const ALLOWED_LISTEN_ADDRESSES: &[&str] = &["127.0.0.1", "localhost", "::1", "0.0.0.0", "::"];

impl HubConfig {
    /// Resolve CLI args plus the `PORT`/`INSPECTOR_PORT`/`VERBOSE`
    /// environment fallbacks (`§6`: `INSPECTOR_PORT` wins if both are set).
    pub fn resolve(args: CliArgs) -> Result<Self, ConfigError> {
        let port = Self::resolve_port(args.port)?;
        Self::validate_listen(&args.listen)?;

        let verbose = args.verbose || std::env::var("VERBOSE").map(|v| v == "true").unwrap_or(false);

        let public_address = match args.public_address {
            Some(raw) => {
                Url::parse(&raw).map_err(|e| ConfigError::InvalidPublicAddress(e.to_string()))?;
                raw
            }
            None => format!("http://{}:{}", args.listen, port),
        };

        Ok(Self { port, listen: args.listen, public_address, verbose })
    }

    fn resolve_port(cli_port: Option<u16>) -> Result<u16, ConfigError> {
        if let Ok(inspector_port) = std::env::var("INSPECTOR_PORT") {
            return Self::parse_port(&inspector_port);
        }
        if let Ok(env_port) = std::env::var("PORT") {
            return Self::parse_port(&env_port);
        }
        Ok(cli_port.unwrap_or(DEFAULT_PORT))
    }

    fn parse_port(raw: &str) -> Result<u16, ConfigError> {
        let value: u32 = raw.parse().map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
        if value == 0 || value > 65535 {
            return Err(ConfigError::InvalidPort(raw.to_string()));
        }
        Ok(value as u16)
    }

    fn validate_listen(listen: &str) -> Result<(), ConfigError> {
        if ALLOWED_LISTEN_ADDRESSES.contains(&listen) {
            Ok(())
        } else {
            Err(ConfigError::InvalidListenAddress(listen.to_string()))
        }
    }

    pub fn bind_address(&self) -> String {
        let host = if self.listen == "::" || self.listen == "::1" {
            format!("[{}]", self.listen)
        } else {
            self.listen.clone()
        };
        format!("{host}:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(port: Option<u16>, listen: &str, public: Option<&str>) -> CliArgs {
        CliArgs { port, listen: listen.to_string(), public_address: public.map(String::from), verbose: false }
    }

    #[test]
    fn default_port_is_7318() {
        let config = HubConfig::resolve(args(None, "127.0.0.1", None)).unwrap();
        assert_eq!(config.port, 7318);
        assert_eq!(config.public_address, "http://127.0.0.1:7318");
    }

    #[test]
    fn zero_port_is_rejected() {
        assert!(matches!(HubConfig::parse_port("0"), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        assert!(matches!(HubConfig::parse_port("65536"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(HubConfig::parse_port("not-a-number"), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn listen_address_outside_allow_list_is_rejected() {
        let result = HubConfig::resolve(args(None, "10.0.0.5", None));
        assert!(matches!(result, Err(ConfigError::InvalidListenAddress(_))));
    }

    #[test]
    fn unparseable_public_address_is_rejected() {
        let result = HubConfig::resolve(args(None, "127.0.0.1", Some("not a url")));
        assert!(matches!(result, Err(ConfigError::InvalidPublicAddress(_))));
    }
}
