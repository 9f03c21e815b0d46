//! Proxy route table and lookup.
//!
//! # Responsibilities
//! - Store the proxied endpoints
//! - Look up the endpoint for a request path
//! - Build the query string forwarded to the node
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Exact path matching; paths are unique, checked at construction
//! - Only allow-listed query parameters ever reach the node

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use url::form_urlencoded;

/// A single proxied API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    /// Path served by the explorer (exact match).
    pub external_path: String,
    /// Path requested on the node.
    pub upstream_path: String,
    /// Query parameters copied to the node, in this order.
    pub forwarded_params: Vec<String>,
}

impl ProxyEndpoint {
    pub fn new(external_path: &str, upstream_path: &str, forwarded_params: &[&str]) -> Self {
        Self {
            external_path: external_path.to_string(),
            upstream_path: upstream_path.to_string(),
            forwarded_params: forwarded_params.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Build the node query string from the inbound raw query.
    ///
    /// Returns `None` when the endpoint forwards no parameters. Otherwise
    /// every declared parameter is present, in declared order, with the
    /// first inbound value or an empty string.
    pub fn forwarded_query(&self, inbound: Option<&str>) -> Option<String> {
        if self.forwarded_params.is_empty() {
            return None;
        }

        let pairs: Vec<_> = form_urlencoded::parse(inbound.unwrap_or_default().as_bytes()).collect();

        let mut query = form_urlencoded::Serializer::new(String::new());
        for name in &self.forwarded_params {
            let value = pairs
                .iter()
                .find(|(key, _)| key.as_ref() == name.as_str())
                .map(|(_, value)| value.as_ref())
                .unwrap_or("");
            query.append_pair(name, value);
        }
        Some(query.finish())
    }
}

/// The endpoints served by default.
pub fn default_endpoints() -> Vec<ProxyEndpoint> {
    vec![
        ProxyEndpoint::new("/api/block", "/block", &["hash"]),
        ProxyEndpoint::new("/api/blocks", "/blocks", &["start", "end"]),
        ProxyEndpoint::new("/api/coinSupply", "/explorer/getEffectiveOutputs", &[]),
        ProxyEndpoint::new("/api/blockchain/metadata", "/blockchain/metadata", &[]),
        ProxyEndpoint::new("/api/address", "/explorer/address", &["address"]),
        ProxyEndpoint::new("/api/currentBalance", "/outputs", &["addrs"]),
        ProxyEndpoint::new("/api/uxout", "/uxout", &["uxid"]),
        ProxyEndpoint::new("/api/transaction", "/transaction", &["txid"]),
    ]
}

/// Errors raised while building a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("external path {0:?} is registered more than once")]
    DuplicatePath(String),

    #[error("invalid endpoint path {0:?}: must start with '/' and contain no '{{', '}}' or '*'")]
    InvalidPath(String),
}

/// Immutable table of proxied endpoints.
#[derive(Debug, Clone)]
pub struct RouteTable {
    endpoints: Vec<Arc<ProxyEndpoint>>,
}

impl RouteTable {
    /// Build a table, rejecting duplicate or malformed paths.
    pub fn new(endpoints: Vec<ProxyEndpoint>) -> Result<Self, RouteTableError> {
        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            for path in [&endpoint.external_path, &endpoint.upstream_path] {
                if !is_valid_path(path) {
                    return Err(RouteTableError::InvalidPath(path.clone()));
                }
            }
            if !seen.insert(endpoint.external_path.as_str()) {
                return Err(RouteTableError::DuplicatePath(endpoint.external_path.clone()));
            }
        }

        Ok(Self {
            endpoints: endpoints.into_iter().map(Arc::new).collect(),
        })
    }

    /// Find the endpoint registered for `path`.
    pub fn lookup(&self, path: &str) -> Option<&Arc<ProxyEndpoint>> {
        self.endpoints.iter().find(|e| e.external_path == path)
    }

    pub fn endpoints(&self) -> &[Arc<ProxyEndpoint>] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints().into_iter().map(Arc::new).collect(),
        }
    }
}

fn is_valid_path(path: &str) -> bool {
    path.starts_with('/') && !path.contains(['{', '}', '*'])
}
