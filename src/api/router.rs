//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Diagnostic routes live under the configured base path; `/health` is
//! always at the root.
//!
//! Layers (outermost → innermost):
//! 1. CORS → 2. Access log → 3. Body limit → Handler

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::AppConfig;

/// Build the application router.
pub fn app_router(ctx: ApiContext, config: &AppConfig) -> Router {
    let process_path = format!(
        "{}/diagnostic/process",
        config.api_base.trim_end_matches('/')
    );

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route(&process_path, post(endpoints::diagnostic::process))
        .fallback(endpoints::not_found)
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(cors_layer(&config.cors_origin))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origin == "*" {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS origin, cross-origin requests will be refused");
            layer
        }
    }
}
