//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (hyper connection, timeouts, lifecycle tracking)
//!     → deadline.rs (stalled writes fail after the write timeout)
//!     → Hand off to the Axum router
//!
//! Connection States:
//!     Accepted → Serving → Closing (idle or shutdown) → Closed
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Each connection tracked for graceful shutdown
//! - Idle or shutdown closing never interrupts a response that is being written
//! - A client that stops reading loses its connection after the write timeout

pub mod connection;
pub mod deadline;
pub mod listener;

pub use listener::{Listener, ListenerError};
