//! Presence-only authorization gate.
//!
//! Rejects requests whose `Authorization` header is missing or empty. The
//! credential itself is not validated; any non-empty value passes.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::http::request::RequestIdExt;

/// Body of the 401 response.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// True when the first `Authorization` value is present and non-empty.
pub fn has_credential<B>(request: &Request<B>) -> bool {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .is_some_and(|value| !value.as_bytes().is_empty())
}

pub async fn require_authorization(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if !has_credential(&request) {
        tracing::warn!(
            request_id = %request.request_id(),
            path = %request.uri().path(),
            "Rejected request without Authorization header"
        );
        return Err((StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE));
    }

    Ok(next.run(request).await)
}
