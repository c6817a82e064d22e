//! Request spans.
//!
//! # Responsibilities
//! - Create one span per inbound request
//! - Attach the request ID so every event inside the request carries it

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::RequestIdExt;

/// Span factory for `TraceLayer::make_span_with`.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request.request_id(),
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}
