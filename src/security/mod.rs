//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request on a protected route:
//!     → auth.rs (Authorization header present and non-empty?)
//!     → Pass to the proxy forwarder
//! ```
//!
//! # Design Decisions
//! - Presence check only; credentials are not verified here
//! - Fail closed: a missing header stops the chain with 401

pub mod auth;

pub use auth::require_authorization;
