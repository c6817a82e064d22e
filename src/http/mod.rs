//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, outbound request construction)
//!     → proxy.rs (forward to the upstream)
//!     → response.rs (relay status/headers, capped body)
//!     → Send to client
//!
//! health.rs and docs.rs answer locally and never touch the upstream.
//! ```

pub mod docs;
pub mod health;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, RequestIdLayer, Upstream, X_REQUEST_ID};
pub use response::{ProxyError, RelayBody};
pub use server::{AppState, HttpServer};
