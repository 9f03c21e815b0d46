//! Configuration validation.
//!
//! # Responsibilities
//! - Parse the node address and enforce that it carries a scheme
//! - Reduce the node address to scheme and host
//!
//! # Design Decisions
//! - Validation is a pure function of the raw value, so it runs before any
//!   socket is bound
//! - A missing scheme is never defaulted

use url::{ParseError, Position, Url};

use crate::config::loader::ConfigError;
use crate::config::schema::NodeAddr;

/// Parse a raw `SKYCOIN_ADDR` value into a [`NodeAddr`].
///
/// Only the scheme and the `host[:port]` part survive; path, query and
/// fragment are dropped.
pub fn parse_node_addr(raw: &str) -> Result<NodeAddr, ConfigError> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            return Err(ConfigError::MissingScheme {
                value: raw.to_string(),
            })
        }
        Err(source) => {
            return Err(ConfigError::InvalidNodeAddr {
                value: raw.to_string(),
                source,
            })
        }
    };

    if url.scheme().is_empty() {
        return Err(ConfigError::MissingScheme {
            value: raw.to_string(),
        });
    }

    let host = &url[Position::BeforeHost..Position::AfterPort];
    Ok(NodeAddr::new(url.scheme(), host))
}
