//! API documentation endpoints under `/swagger`.
//!
//! `doc.json` is an OpenAPI 3.0 document describing the gateway's own
//! routes; `index.html` loads Swagger UI from a CDN and points it at it.

use std::sync::Arc;

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::config::DocsConfig;

const SWAGGER_UI_VERSION: &str = "5";

/// OpenAPI document for the gateway.
pub fn openapi_document(public_url: &str) -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "API Gateway",
            "version": "1.0",
            "description": "This is an API Gateway server."
        },
        "servers": [{ "url": public_url }],
        "tags": [
            { "name": "health" },
            { "name": "locations" }
        ],
        "paths": {
            "/health": {
                "get": {
                    "tags": ["health"],
                    "summary": "Health check endpoint",
                    "description": "Get the health status of the API",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/api/v1/locations": {
                "get": locations_operation("Proxy location service requests"),
                "post": locations_operation("Proxy location service requests")
            }
        }
    })
}

fn locations_operation(summary: &str) -> Value {
    json!({
        "tags": ["locations"],
        "summary": summary,
        "description": "Forward requests to the location service",
        "parameters": [{
            "name": "Authorization",
            "in": "header",
            "required": true,
            "description": "Bearer token",
            "schema": { "type": "string" }
        }],
        "responses": {
            "200": { "description": "Upstream response", "content": { "application/json": { "schema": { "type": "object" } } } },
            "401": { "description": "Unauthorized" },
            "502": { "description": "Bad Gateway" }
        }
    })
}

fn index_page(doc_url: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>API Gateway - Swagger UI</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{v}/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@{v}/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "{doc_url}", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>
"##,
        v = SWAGGER_UI_VERSION,
        doc_url = doc_url,
    )
}

/// Router serving `/swagger/`, `/swagger/index.html` and `/swagger/doc.json`.
pub fn docs_router<S>(config: &DocsConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let public_url = config.public_url.trim_end_matches('/');
    let document = Arc::new(openapi_document(public_url));
    let page = Arc::new(index_page(&format!("{}/swagger/doc.json", public_url)));

    let index = {
        let page = page.clone();
        move || {
            let page = page.clone();
            async move { Html(page.as_str().to_owned()).into_response() }
        }
    };

    Router::new()
        .route("/swagger/", get(index.clone()))
        .route("/swagger/index.html", get(index))
        .route(
            "/swagger/doc.json",
            get(move || {
                let document = document.clone();
                async move { Json(document.as_ref().clone()) }
            }),
        )
}
