//! API Gateway
//!
//! A small reverse proxy built with Tokio and Axum. Requests to
//! `/api/v1/locations` that carry an `Authorization` header are forwarded to a
//! single upstream service; the upstream response is relayed back with its
//! body capped.
//!
//! # Architecture Overview
//!
//! ```text
//!  Client ──▶ request id ─▶ trace ─▶ CORS ─▶ catch panic ─▶ timeout ─┬─▶ /health        (200 OK)
//!                                                                   ├─▶ /swagger/*     (docs)
//!                                                                   └─▶ auth gate ─▶ proxy forwarder ──▶ Upstream
//!  Client ◀──────────────────── relayed response (body ≤ 1 MiB) ◀───────────────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
