//! Node client error definitions.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to the node.
///
/// The messages carry transport detail for server-side logs only; callers
/// of the explorer never see them.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The HTTP client could not be constructed.
    #[error("failed to build node client: {0}")]
    Client(#[source] reqwest::Error),

    /// No complete response within the configured limit.
    #[error("node request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, connect, TLS or protocol failure.
    #[error("node request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
