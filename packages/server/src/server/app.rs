//! Application setup and router construction.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::server::middleware::cross_origin_isolation;
use crate::server::routes::{get_letter_handler, health_handler, mark_mailed_handler};
use crate::server::static_files::serve_scanner;

/// Timeout on every forwarded upstream request. The proxy must never hold a
/// browser connection open on a hung upstream.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub upstream_base: String,
}

impl AppState {
    pub fn new(upstream_base: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("failed to build upstream HTTP client")?;
        Ok(Self {
            http,
            upstream_base: upstream_base.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Build the Axum application router
///
/// Two proxied letter routes, a liveness probe, and the embedded scanner
/// bundle for everything else. Cross-origin isolation headers go on every
/// response — the decoding worker needs them on assets and API alike.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/letters/:id", get(get_letter_handler))
        .route("/api/letters/:id/mark_mailed", post(mark_mailed_handler))
        .route("/api/health", get(health_handler))
        .fallback(get(serve_scanner))
        .layer(axum::middleware::from_fn(cross_origin_isolation))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
