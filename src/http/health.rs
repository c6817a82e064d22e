//! Static health responder, shared by the gateway and the standalone
//! health-check process.

use std::net::SocketAddr;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

/// Body of every health response.
pub const HEALTH_BODY: &str = "OK";

/// Always 200 `OK`, whatever the method, headers or body.
pub async fn health_check() -> &'static str {
    HEALTH_BODY
}

/// Router exposing only `/health`.
pub fn health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", any(health_check))
}

/// Serve the health route alone until `shutdown` fires.
pub async fn serve_health(
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!(address = %addr, "Health server starting");

    let app: Router = health_router().layer(TraceLayer::new_for_http());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Health server stopped");
    Ok(())
}
