//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → net::connection (hyper, header/idle timeouts)
//!     → server.rs (Axum router, request ID, tracing, response timeout)
//!     → proxy.rs (exact API path) ──→ node client ──→ response.rs (relay body)
//!     → assets.rs (everything else: files, app shell, redirects)
//!     → Send to client
//! ```

pub mod assets;
pub mod proxy;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer, ServerError};
