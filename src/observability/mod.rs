//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (node_url, bytes_written, ...)
//!     → TraceLayer spans per request, tagged with x-request-id
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
