//! Proxy forwarder.
//!
//! Turns one inbound request into one upstream request, executes it through
//! the shared client and relays the result. No retries: every failure is
//! terminal for the request.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

use crate::http::request::RequestIdExt;
use crate::http::response::{relay_response, ProxyError};
use crate::http::server::AppState;

/// Forward a matched request to the upstream.
pub async fn forward(State(state): State<AppState>, request: Request<Body>) -> Response {
    let deadline = Instant::now() + state.request_timeout;
    let request_id = request.request_id().to_string();
    let (parts, body) = request.into_parts();

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        upstream = %state.upstream.base_url(),
        "Proxying request"
    );

    let outbound = match state
        .upstream
        .build_request(parts.method, &parts.uri, &parts.headers, body)
    {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream request");
            return e.into_response();
        }
    };

    match state.client.request(outbound).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                status = %response.status(),
                "Upstream responded"
            );
            relay_response(response, state.max_response_bytes, Some(deadline), &request_id)
        }
        Err(e) => {
            let err = ProxyError::from(e);
            tracing::error!(request_id = %request_id, error = %err, "Upstream error");
            err.into_response()
        }
    }
}
