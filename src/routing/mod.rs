//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (exact lookup in the proxy endpoint table)
//!     → site.rs (longest-match over asset, app shell and redirect rules)
//!     → matcher.rs (evaluate exact / prefix patterns)
//!
//! Route Compilation (at startup):
//!     ProxyEndpoint[]
//!     → Validate paths and uniqueness
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Tables built at startup, immutable at runtime
//! - No regex in hot path (exact and prefix matching only)
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;
pub mod site;

pub use router::{default_endpoints, ProxyEndpoint, RouteTable, RouteTableError};
pub use site::{SiteAction, SiteRoutes};
