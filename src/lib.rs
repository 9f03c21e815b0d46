//! Skycoin explorer edge service.
//!
//! Serves the explorer's prebuilt single-page app and forwards a fixed set
//! of API paths to a skycoin node, relaying the node's response bytes.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────┼─▶│   net    │──▶│   http   │──▶│  routing  │  │
//!                     │  │ listener │   │  server  │   │  tables   │  │
//!                     │  └──────────┘   └──────────┘   └─────┬─────┘  │
//!                     │                      ┌───────────────┴──────┐ │
//!                     │                      ▼                      ▼ │
//!                     │               ┌────────────┐       ┌────────┐ │
//!                     │               │ http::proxy│       │ assets │ │      ./dist
//!                     │               └─────┬──────┘       └────────┘◀┼────────────
//!                     │                     ▼                         │
//!   Client Response   │  ┌──────────┐  ┌────────────┐                 │
//!   ◀─────────────────┼──│ response │◀─│ node client│◀────────────────┼──── Skycoin
//!                     │  │  relay   │  └────────────┘                 │     node
//!                     │  └──────────┘                                 │
//!                     └───────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod node;
pub mod observability;
pub mod routing;

pub use cli::Cli;
pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
