//! HTTP client for the skycoin node with a hard request timeout.
//!
//! # Responsibilities
//! - Build node URLs from the configured scheme and host
//! - Issue one GET per proxied request, no retries
//! - Classify timeouts separately from other transport failures

use std::time::Duration;

use crate::config::{NodeAddr, UpstreamConfig};
use crate::node::types::{NodeError, NodeResult};
use crate::routing::ProxyEndpoint;

/// Shared, connection-pooling client for the node's HTTP API.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    node: NodeAddr,
    timeout: Duration,
}

impl NodeClient {
    /// Create a client for the configured node.
    pub fn new(config: &UpstreamConfig) -> NodeResult<Self> {
        // The node is a direct backend; never route it through HTTP_PROXY.
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .no_proxy()
            .build()
            .map_err(NodeError::Client)?;

        Ok(Self {
            http,
            node: config.node.clone(),
            timeout: config.timeout,
        })
    }

    /// Node URL for `endpoint`, carrying only its allow-listed parameters.
    pub fn url_for(&self, endpoint: &ProxyEndpoint, inbound_query: Option<&str>) -> String {
        let query = endpoint.forwarded_query(inbound_query);
        self.node.url_for(&endpoint.upstream_path, query.as_deref())
    }

    /// Send a bare GET to `url`. No inbound headers are attached.
    ///
    /// The timeout covers the whole exchange, so reading the returned
    /// body can still fail with a timeout later.
    pub async fn get(&self, url: &str) -> NodeResult<reqwest::Response> {
        self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                NodeError::Timeout(self.timeout)
            } else {
                NodeError::Transport(e)
            }
        })
    }

    pub fn node(&self) -> &NodeAddr {
        &self.node
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("node", &self.node.to_string())
            .field("timeout", &self.timeout)
            .finish()
    }
}
