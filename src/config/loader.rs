//! Configuration loading from the process environment and command line.

use thiserror::Error;

use crate::cli::Cli;
use crate::config::schema::{ServiceConfig, DEFAULT_EXPLORER_HOST, DEFAULT_SKYCOIN_ADDR};
use crate::config::validation::parse_node_addr;

/// Environment variable holding the bind address.
pub const EXPLORER_HOST_VAR: &str = "EXPLORER_HOST";

/// Environment variable holding the node address.
pub const SKYCOIN_ADDR_VAR: &str = "SKYCOIN_ADDR";

/// Error type for configuration loading. All variants are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SKYCOIN_ADDR {value:?}: {source}")]
    InvalidNodeAddr {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("SKYCOIN_ADDR must have a scheme, e.g. http:// (got {value:?})")]
    MissingScheme { value: String },
}

/// Load and validate configuration from the real environment.
pub fn load_config(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    load_with(|name| std::env::var(name).ok(), cli)
}

/// Load configuration using `lookup` to read environment variables.
///
/// Unset and empty variables both fall back to their defaults.
pub fn load_with<F>(lookup: F, cli: &Cli) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str, default: &str| {
        lookup(name)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let mut config = ServiceConfig::default();

    config.listener.bind_address = read(EXPLORER_HOST_VAR, DEFAULT_EXPLORER_HOST);
    config.listener.max_connections = cli.max_connections;

    let node = parse_node_addr(&read(SKYCOIN_ADDR_VAR, DEFAULT_SKYCOIN_ADDR))?;
    if node.host().is_empty() {
        tracing::warn!(node = %node, "SKYCOIN_ADDR has no host, node requests will fail");
    }
    config.upstream.node = node;

    config.site.api_only = cli.api_only;
    config.site.dist_dir = cli.dist_dir.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("skycoin-explorer").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load_with(env(&[]), &cli(&[])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8001");
        assert_eq!(config.upstream.node.to_string(), "http://127.0.0.1:6420");
        assert!(!config.site.api_only);
        assert_eq!(config.site.dist_dir, PathBuf::from("./dist"));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let lookup = env(&[(EXPLORER_HOST_VAR, ""), (SKYCOIN_ADDR_VAR, "")]);
        let config = load_with(lookup, &cli(&[])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8001");
        assert_eq!(config.upstream.node.to_string(), "http://127.0.0.1:6420");
    }

    #[test]
    fn test_overrides() {
        let lookup = env(&[
            (EXPLORER_HOST_VAR, "0.0.0.0:9000"),
            (SKYCOIN_ADDR_VAR, "https://node.example.com:6420/ignored?x=1"),
        ]);
        let config = load_with(lookup, &cli(&["--api-only", "--dist-dir", "/srv/explorer"])).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.upstream.node.to_string(), "https://node.example.com:6420");
        assert!(config.site.api_only);
        assert_eq!(config.site.dist_dir, PathBuf::from("/srv/explorer"));
    }

    #[test]
    fn test_bind_address_is_not_validated() {
        let lookup = env(&[(EXPLORER_HOST_VAR, "not an address")]);
        let config = load_with(lookup, &cli(&[])).unwrap();
        assert_eq!(config.listener.bind_address, "not an address");
    }

    #[test]
    fn test_node_without_scheme_is_fatal() {
        let lookup = env(&[(SKYCOIN_ADDR_VAR, "127.0.0.1:6420")]);
        let err = load_with(lookup, &cli(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingScheme { .. }));
    }

    #[test]
    fn test_unusual_scheme_is_accepted() {
        let lookup = env(&[(SKYCOIN_ADDR_VAR, "ftp://x")]);
        let config = load_with(lookup, &cli(&[])).unwrap();
        assert_eq!(config.upstream.node.scheme(), "ftp");
    }
}
