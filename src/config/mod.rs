//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! EXPLORER_HOST, SKYCOIN_ADDR, CLI flags
//!     → loader.rs (read env, apply defaults)
//!     → validation.rs (node address must carry a scheme)
//!     → ServiceConfig (validated, immutable)
//!     → moved into the HTTP server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so an empty environment is a valid setup
//! - Any validation failure aborts startup before the listener binds

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, NodeAddr, ServerTimeouts, ServiceConfig, SiteConfig, UpstreamConfig,
};
