//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the explorer.
//! Every section has defaults matching the documented environment defaults,
//! so `ServiceConfig::default()` is a runnable configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default bind address when `EXPLORER_HOST` is unset.
pub const DEFAULT_EXPLORER_HOST: &str = "127.0.0.1:8001";

/// Default node address when `SKYCOIN_ADDR` is unset.
pub const DEFAULT_SKYCOIN_ADDR: &str = "http://127.0.0.1:6420";

/// Root configuration for the explorer service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Backend node the API endpoints are proxied to.
    pub upstream: UpstreamConfig,

    /// Server-side connection limits.
    pub server: ServerTimeouts,

    /// Static site settings.
    pub site: SiteConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address (`host:port`, no scheme).
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_EXPLORER_HOST.to_string(),
            max_connections: 10_000,
        }
    }
}

/// Scheme and host of the backend node.
///
/// Any path, query or fragment given in `SKYCOIN_ADDR` is discarded when
/// this is built, so URLs are always `scheme://host` plus an endpoint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAddr {
    scheme: String,
    host: String,
}

impl NodeAddr {
    /// Create a node address. The scheme must be non-empty; use
    /// [`crate::config::validation::parse_node_addr`] for untrusted input.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host including the port, if one was given.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build the absolute URL for `path` with an already encoded query.
    pub fn url_for(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) => format!("{}://{}{}?{}", self.scheme, self.host, path, query),
            None => format!("{}://{}{}", self.scheme, self.host, path),
        }
    }
}

impl Default for NodeAddr {
    fn default() -> Self {
        Self::new("http", "127.0.0.1:6420")
    }
}

impl std::fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

/// Upstream node configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Where the node's HTTP API lives.
    pub node: NodeAddr,

    /// Hard limit for a complete node response, body included.
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            node: NodeAddr::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Server-side limits for inbound connections.
#[derive(Debug, Clone)]
pub struct ServerTimeouts {
    /// Time allowed to receive request headers.
    pub read: Duration,

    /// Time allowed to produce a response head, and the longest a single
    /// socket write may stay blocked on a client that is not reading.
    pub write: Duration,

    /// Keep-alive connections with no request activity are closed after this.
    pub idle: Duration,

    /// How long shutdown waits for open connections to drain.
    pub shutdown_grace: Duration,
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(10),
            write: Duration::from_secs(60),
            idle: Duration::from_secs(120),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Static single-page application settings.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Serve only the proxy endpoints.
    pub api_only: bool,

    /// Directory holding the built application (`index.html` and assets).
    pub dist_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api_only: false,
            dist_dir: PathBuf::from("./dist"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_query() {
        let node = NodeAddr::default();
        assert_eq!(
            node.url_for("/blockchain/metadata", None),
            "http://127.0.0.1:6420/blockchain/metadata"
        );
    }

    #[test]
    fn url_with_query() {
        let node = NodeAddr::new("https", "node.example.com:6420");
        assert_eq!(
            node.url_for("/blocks", Some("start=1&end=5")),
            "https://node.example.com:6420/blocks?start=1&end=5"
        );
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8001");
        assert_eq!(config.upstream.node.to_string(), "http://127.0.0.1:6420");
        assert_eq!(config.upstream.timeout, Duration::from_secs(30));
        assert_eq!(config.server.read, Duration::from_secs(10));
        assert_eq!(config.server.write, Duration::from_secs(60));
        assert_eq!(config.server.idle, Duration::from_secs(120));
        assert!(!config.site.api_only);
    }
}
