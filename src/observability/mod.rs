//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, pretty or JSON)
//!     → tracing.rs (one span per request, tagged with its request ID)
//!
//! Consumers:
//!     → stdout, collected by the container runtime
//! ```

pub mod logging;
pub mod tracing;

pub use logging::init_logging;
