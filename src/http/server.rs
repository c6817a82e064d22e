//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every route and middleware layer
//! - Own the single long-lived upstream client
//! - Bind the router to a listener and serve until shutdown
//!
//! # Middleware order (outermost first)
//! ```text
//! RequestIdLayer → TraceLayer → CORS → CatchPanicLayer → request timeout
//!     → /health, /swagger/*                      (public)
//!     → auth gate → /api/v1/locations[/...]      (protected, forwarded)
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{CorsConfig, GatewayConfig};
use crate::http::docs::docs_router;
use crate::http::health::health_router;
use crate::http::proxy::forward;
use crate::http::request::{RequestIdLayer, Upstream};
use crate::observability::tracing::request_span;
use crate::resilience::timeouts::{enforce_request_timeout, RequestTimeout};
use crate::security::auth::require_authorization;

/// Upstream client type shared by all requests.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<Upstream>,
    pub client: UpstreamClient,
    pub max_response_bytes: u64,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(
            config.upstream.connect_timeout_secs,
        )));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            upstream: Arc::new(Upstream::new(config.upstream.url.clone())),
            client,
            max_response_bytes: config.upstream.max_response_bytes,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    let locations = Router::new()
        .route("/api/v1/locations", get(forward).post(forward))
        .route("/api/v1/locations/", get(forward).post(forward))
        .route("/api/v1/locations/{*rest}", get(forward).post(forward))
        .route_layer(middleware::from_fn(require_authorization));

    let mut router = Router::new().merge(health_router()).merge(locations);
    if config.docs.enabled {
        router = router.merge(docs_router(&config.docs));
    }

    with_middleware(router.with_state(state), config)
}

/// Wrap a router in the gateway's middleware stack.
fn with_middleware(router: Router, config: &GatewayConfig) -> Router {
    let timeout = RequestTimeout(Duration::from_secs(config.timeouts.request_secs));

    router
        .layer(middleware::from_fn_with_state(timeout, enforce_request_timeout))
        .layer(CatchPanicLayer::new())
        .layer(build_cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(RequestIdLayer)
}

/// CORS layer from configuration. Entries that fail to parse are skipped.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.max_age_secs))
}
