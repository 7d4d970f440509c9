//! Default-key configuration handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::handlers::ensure_active;
use crate::api::handlers::issuers::{
    ReadDefaultResponse, WriteDefaultRequest, WriteDefaultResponse,
};
use crate::backend::Backend;

/// Read the default key
///
/// GET /v1/config/keys — served locally on every cluster node.
pub async fn read_default_key(
    State(backend): State<Arc<Backend>>,
) -> Result<Json<ReadDefaultResponse>, ApiError> {
    let id = backend.read_default_key().await?;
    Ok(Json(ReadDefaultResponse {
        default: id.unwrap_or_default(),
    }))
}

/// Set the default key
///
/// POST /v1/config/keys — forwarded to the active node in HA.
pub async fn write_default_key(
    State(backend): State<Arc<Backend>>,
    Json(request): Json<WriteDefaultRequest>,
) -> Result<Json<WriteDefaultResponse>, ApiError> {
    ensure_active(&backend)?;
    let update = backend.write_default_key(&request.default).await?;
    Ok(Json(WriteDefaultResponse {
        default: update.id,
        warnings: update.warning.into_iter().collect(),
    }))
}
