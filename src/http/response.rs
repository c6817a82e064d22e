//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response (status, headers, body) to the client
//! - Cap the relayed body at a fixed number of bytes
//! - Abort the relay when the request deadline passes mid-stream
//! - Map forwarding errors to HTTP status codes
//!
//! # Design Decisions
//! - Streaming relay; the upstream body is never buffered in full
//! - Bytes past the cap are dropped silently, the stream just ends
//! - Failures after the response head is committed are only logged

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::{
    body::Body,
    http::{header, HeaderMap, Response, StatusCode},
    response::IntoResponse,
    BoxError,
};
use hyper::body::{Body as HttpBody, Bytes, Frame, SizeHint};
use tokio::time::{Instant, Sleep};

/// Fixed message for requests that could not be turned into an upstream request.
pub const BUILD_REQUEST_MESSAGE: &str = "Error creating proxy request";

/// Fixed message for upstream transport failures.
pub const FORWARD_MESSAGE: &str = "Error forwarding request";

/// Errors raised while forwarding a request upstream.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The outbound request could not be constructed. Upstream was not contacted.
    #[error("failed to build upstream request: {0}")]
    BuildRequest(#[from] axum::http::Error),

    /// The upstream could not be reached or the exchange failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

impl ProxyError {
    /// Status code reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BuildRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Client-facing message. Never includes internal error detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::BuildRequest(_) => BUILD_REQUEST_MESSAGE,
            ProxyError::Upstream(_) => FORWARD_MESSAGE,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), self.public_message()).into_response()
    }
}

/// Error surfaced to hyper when the relay is aborted.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("request deadline elapsed while relaying upstream body")]
    DeadlineElapsed,
}

/// Turn an upstream response into the client response.
///
/// Status and every header are copied as-is, except `Content-Length` when it
/// announces more than `max_bytes` (the relayed body will be shorter).
pub fn relay_response<B>(
    upstream: Response<B>,
    max_bytes: u64,
    deadline: Option<Instant>,
    request_id: &str,
) -> axum::response::Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (mut parts, body) = upstream.into_parts();

    if declared_length(&parts.headers).is_some_and(|len| len > max_bytes) {
        tracing::debug!(
            request_id = %request_id,
            max_bytes,
            "Upstream body exceeds relay cap, dropping Content-Length"
        );
        parts.headers.remove(header::CONTENT_LENGTH);
    }

    let mut body = RelayBody::new(body, max_bytes, request_id);
    if let Some(deadline) = deadline {
        body = body.with_deadline(deadline);
    }

    Response::from_parts(parts, Body::new(body))
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Body adapter that yields at most `limit` bytes of the wrapped body.
pub struct RelayBody<B> {
    inner: Pin<Box<B>>,
    remaining: u64,
    relayed: u64,
    deadline: Option<Pin<Box<Sleep>>>,
    finished: bool,
    request_id: String,
}

impl<B> RelayBody<B>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    pub fn new(inner: B, limit: u64, request_id: impl Into<String>) -> Self {
        Self {
            inner: Box::pin(inner),
            remaining: limit,
            relayed: 0,
            deadline: None,
            finished: false,
            request_id: request_id.into(),
        }
    }

    /// Abort the relay if it is still running at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(Box::pin(tokio::time::sleep_until(deadline)));
        self
    }

    /// Bytes handed to the client so far.
    pub fn relayed(&self) -> u64 {
        self.relayed
    }
}

impl<B> HttpBody for RelayBody<B>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }
        if this.remaining == 0 {
            this.finished = true;
            return Poll::Ready(None);
        }

        if let Some(deadline) = this.deadline.as_mut() {
            if deadline.as_mut().poll(cx).is_ready() {
                this.finished = true;
                tracing::error!(
                    request_id = %this.request_id,
                    relayed = this.relayed,
                    "Error writing response: request deadline elapsed"
                );
                return Poll::Ready(Some(Err(RelayError::DeadlineElapsed.into())));
            }
        }

        match ready!(this.inner.as_mut().poll_frame(cx)) {
            None => {
                this.finished = true;
                Poll::Ready(None)
            }
            Some(Ok(frame)) => match frame.into_data() {
                Ok(mut data) => {
                    let len = data.len() as u64;
                    if len > this.remaining {
                        data.truncate(this.remaining as usize);
                        tracing::debug!(
                            request_id = %this.request_id,
                            relayed = this.relayed + this.remaining,
                            "Upstream body truncated at relay cap"
                        );
                    }
                    let sent = data.len() as u64;
                    this.remaining -= sent;
                    this.relayed += sent;
                    Poll::Ready(Some(Ok(Frame::data(data))))
                }
                // trailers
                Err(frame) => Poll::Ready(Some(Ok(frame))),
            },
            Some(Err(e)) => {
                this.finished = true;
                let e: BoxError = e.into();
                tracing::error!(
                    request_id = %this.request_id,
                    relayed = this.relayed,
                    error = %e,
                    "Error writing response"
                );
                Poll::Ready(Some(Err(e)))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.finished || self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        let inner = self.inner.size_hint();
        let mut hint = SizeHint::new();
        hint.set_lower(inner.lower().min(self.remaining));
        match inner.upper() {
            Some(upper) => hint.set_upper(upper.min(self.remaining)),
            None => hint.set_upper(self.remaining),
        }
        hint
    }
}

impl<B> Drop for RelayBody<B> {
    fn drop(&mut self) {
        if !self.finished && self.remaining > 0 {
            tracing::warn!(
                request_id = %self.request_id,
                relayed = self.relayed,
                "Error writing response: client went away before relay completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn collect<B>(body: B) -> Bytes
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        axum::body::to_bytes(Body::new(body), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn test_body_under_cap_is_untouched() {
        let body = RelayBody::new(Body::from("hello"), 1024, "test");
        assert_eq!(collect(body).await, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_body_over_cap_is_truncated_exactly() {
        let payload = vec![b'x'; 4096];
        let body = RelayBody::new(Body::from(payload), 1000, "test");
        assert_eq!(collect(body).await.len(), 1000);
    }

    #[tokio::test]
    async fn test_truncation_across_chunks() {
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"aaaa")),
            Ok(Bytes::from_static(b"bbbb")),
            Ok(Bytes::from_static(b"cccc")),
        ];
        let stream = Body::from_stream(futures_util::stream::iter(chunks));
        let body = RelayBody::new(stream, 6, "test");
        assert_eq!(collect(body).await, Bytes::from_static(b"aaaabb"));
    }

    #[test]
    fn test_size_hint_is_capped() {
        let body = RelayBody::new(Body::from(vec![0u8; 10]), 4, "test");
        assert_eq!(body.size_hint().upper(), Some(4));
        assert_eq!(body.size_hint().lower(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_pending_body() {
        let pending = Body::from_stream(futures_util::stream::pending::<Result<Bytes, std::io::Error>>());
        let body = RelayBody::new(pending, 1024, "test")
            .with_deadline(Instant::now() + Duration::from_millis(50));

        let result = axum::body::to_bytes(Body::new(body), usize::MAX).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_error_status_mapping() {
        let err = ProxyError::BuildRequest(
            axum::http::Request::builder()
                .uri("http://[bad")
                .body(())
                .unwrap_err(),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), BUILD_REQUEST_MESSAGE);
    }

    #[test]
    fn test_oversized_content_length_is_dropped() {
        let upstream = Response::builder()
            .status(200)
            .header(header::CONTENT_LENGTH, "5000")
            .header("x-test", "v")
            .body(Body::from(vec![0u8; 5000]))
            .unwrap();
        let relayed = relay_response(upstream, 100, None, "test");
        assert_eq!(relayed.status(), StatusCode::OK);
        assert!(relayed.headers().get(header::CONTENT_LENGTH).is_none());
        assert_eq!(relayed.headers()["x-test"], "v");
    }
}
