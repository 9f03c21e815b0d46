//! Skycoin node integration.
//!
//! # Data Flow
//! ```text
//! ProxyEndpoint + inbound query
//!     → client.rs (build node URL, single GET with hard timeout)
//!     → reqwest::Response (body still streaming)
//!     → http::response relays it to the caller
//! ```
//!
//! # Design Decisions
//! - One shared pooled client, read-only after construction
//! - No retries; one attempt per inbound request
//! - Inbound headers are never forwarded

pub mod client;
pub mod types;

pub use client::NodeClient;
pub use types::{NodeError, NodeResult};
