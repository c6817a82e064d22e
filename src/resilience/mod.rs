//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request:
//!     → timeouts.rs (deadline for the response head, 504 on expiry)
//!     → proxy forwarder (single attempt, no retries)
//!     → response relay (same deadline bounds body streaming)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every request has a deadline
//! - No retries and no circuit breaking: failures are terminal for the request

pub mod timeouts;

pub use timeouts::{enforce_request_timeout, RequestTimeout};
