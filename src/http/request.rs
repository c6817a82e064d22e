//! Request identification and upstream request construction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) unless the client sent one
//! - Echo the request ID on the response
//! - Build the outbound request for the upstream from the inbound one
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The ID travels as an ordinary header, so it is forwarded upstream with the rest
//! - Headers are copied in order, every value of every name

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, Uri},
};
use tower::Layer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestId, RequestId, SetRequestId,
};
use uuid::Uuid;

use crate::http::response::ProxyError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layer that assigns an `x-request-id` to every request and copies it to
/// the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = SetRequestId<PropagateRequestId<S>, MakeRequestUuidV4>;

    fn layer(&self, inner: S) -> Self::Service {
        SetRequestId::new(
            PropagateRequestId::new(inner, X_REQUEST_ID),
            X_REQUEST_ID,
            MakeRequestUuidV4,
        )
    }
}

/// Convenience accessor for the request ID header.
pub trait RequestIdExt {
    /// The request ID, or `"unknown"` if none was assigned.
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// The upstream service requests are forwarded to.
#[derive(Debug, Clone)]
pub struct Upstream {
    base: String,
}

impl Upstream {
    /// `base` is the upstream base URL, e.g. `http://location-service:8080`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Upstream URI for an inbound URI: base URL + path + query.
    ///
    /// The base URL is validated at startup and the inbound path already
    /// parsed as a URI, so an error here is not expected in practice.
    pub fn target_uri(&self, inbound: &Uri) -> Result<Uri, ProxyError> {
        let path_and_query = inbound
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let uri = Uri::try_from(format!("{}{}", self.base, path_and_query))
            .map_err(axum::http::Error::from)?;
        Ok(uri)
    }

    /// Build the outbound request: same method, path, headers, and body,
    /// addressed to the upstream.
    ///
    /// `Host` is left out so the client derives it from the upstream URI.
    pub fn build_request(
        &self,
        method: Method,
        uri: &Uri,
        headers: &axum::http::HeaderMap,
        body: Body,
    ) -> Result<Request<Body>, ProxyError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(self.target_uri(uri)?);

        if let Some(outbound) = builder.headers_mut() {
            for (name, value) in headers.iter() {
                if name == header::HOST {
                    continue;
                }
                outbound.append(name.clone(), value.clone());
            }
        }

        Ok(builder.body(body)?)
    }
}
