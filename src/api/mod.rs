pub mod error;
pub mod route_metrics;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use route_metrics::route_metrics_handler;

pub struct AppState {
    pub config: Config,
}

/// Build the application router. CORS is restricted to the configured origin.
pub fn router(config: Config) -> anyhow::Result<Router> {
    let origin = HeaderValue::from_str(&config.cors_origin)?;
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(origin)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(config.max_upload_bytes);
    let state = Arc::new(AppState { config });

    Ok(Router::new()
        .route("/", get(health_handler))
        .route("/api/bike-routes/metrics", post(route_metrics_handler))
        .layer(ServiceBuilder::new().layer(cors_layer).layer(body_limit))
        .with_state(state))
}

async fn health_handler() -> &'static str {
    "API is running"
}
