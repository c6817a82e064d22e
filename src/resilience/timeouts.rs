//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the time spent producing a response head
//! - Drop the in-flight handler (and its upstream call) on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timed-out requests return 504 Gateway Timeout
//! - Body streaming is bounded separately by the relay deadline

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::RequestIdExt;

/// Per-request deadline for the middleware.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

pub async fn enforce_request_timeout(
    State(RequestTimeout(limit)): State<RequestTimeout>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = request.request_id().to_string();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                request_id = %request_id,
                timeout_secs = limit.as_secs_f64(),
                "Request timed out"
            );
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}
