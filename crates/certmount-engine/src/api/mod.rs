//! API module for the certmount engine

pub mod error;
pub mod handlers;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::backend::Backend;
use crate::catalog;
use crate::migration;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub role: String,
    pub migrated: bool,
    pub issuer_count: usize,
    pub key_count: usize,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
pub async fn ready(State(backend): State<Arc<Backend>>) -> Json<ReadyResponse> {
    let migrated = migration::require_migrated(backend.storage()).await.is_ok();
    let issuer_count = catalog::list_issuer_ids(backend.storage())
        .await
        .map(|v| v.len())
        .unwrap_or(0);
    let key_count = catalog::list_key_ids(backend.storage())
        .await
        .map(|v| v.len())
        .unwrap_or(0);

    Json(ReadyResponse {
        ready: true,
        role: backend.role().to_string(),
        migrated,
        issuer_count,
        key_count,
    })
}

/// Create the API router
pub fn create_router(backend: Arc<Backend>) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Default-issuer configuration
        .route("/v1/config/issuers", get(handlers::read_default_issuer))
        .route("/v1/config/issuers", post(handlers::write_default_issuer))
        .route("/v1/root/replace", post(handlers::replace_root))
        // Default-key configuration
        .route("/v1/config/keys", get(handlers::read_default_key))
        .route("/v1/config/keys", post(handlers::write_default_key))
        // CA bundle import (write-only)
        .route("/v1/config/ca", post(handlers::import_ca))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(backend)
}
