//! Default-issuer configuration handlers
//!
//! `config/issuers` reads and writes the default issuer pointer;
//! `root/replace` is the same write with the reference defaulting to
//! the issuer named `"next"`.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::handlers::ensure_active;
use crate::backend::Backend;

/// Response to a default-pointer read: the configured id, or empty
#[derive(Debug, Serialize)]
pub struct ReadDefaultResponse {
    pub default: String,
}

/// Request to move a default pointer to a concrete reference
#[derive(Debug, Deserialize)]
pub struct WriteDefaultRequest {
    /// Reference (name or identifier) to the new default
    pub default: String,
}

/// Response to a default-pointer write
#[derive(Debug, Serialize)]
pub struct WriteDefaultResponse {
    /// The resolved canonical id now persisted as the default
    pub default: String,

    /// Non-fatal notices attached to the successful write
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Request for `root/replace`; the reference defaults to `"next"`
#[derive(Debug, Default, Deserialize)]
pub struct ReplaceRootRequest {
    #[serde(default)]
    pub default: Option<String>,
}

/// Read the default issuer
///
/// GET /v1/config/issuers — served locally on every cluster node.
pub async fn read_default_issuer(
    State(backend): State<Arc<Backend>>,
) -> Result<Json<ReadDefaultResponse>, ApiError> {
    let id = backend.read_default_issuer().await?;
    Ok(Json(ReadDefaultResponse {
        default: id.unwrap_or_default(),
    }))
}

/// Set the default issuer
///
/// POST /v1/config/issuers — forwarded to the active node in HA.
pub async fn write_default_issuer(
    State(backend): State<Arc<Backend>>,
    Json(request): Json<WriteDefaultRequest>,
) -> Result<Json<WriteDefaultResponse>, ApiError> {
    ensure_active(&backend)?;
    let update = backend.write_default_issuer(&request.default).await?;
    Ok(Json(WriteDefaultResponse {
        default: update.id,
        warnings: update.warning.into_iter().collect(),
    }))
}

/// Promote the staged issuer to default
///
/// POST /v1/root/replace — alias of the `config/issuers` write with
/// the reference defaulting to the issuer named `"next"`. Forwarded to
/// the active node in HA.
pub async fn replace_root(
    State(backend): State<Arc<Backend>>,
    body: Option<Json<ReplaceRootRequest>>,
) -> Result<Json<WriteDefaultResponse>, ApiError> {
    ensure_active(&backend)?;
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let update = backend.replace_root(request.default.as_deref()).await?;
    Ok(Json(WriteDefaultResponse {
        default: update.id,
        warnings: update.warning.into_iter().collect(),
    }))
}
