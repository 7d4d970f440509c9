//! CA bundle import handler
//!
//! Write-only: the submitted private key material is persisted and
//! never re-exposed by any endpoint. That is an intentional,
//! irreversible security property, not a missing feature.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::handlers::ensure_active;
use crate::backend::Backend;

/// Request carrying a concatenated PEM bundle
#[derive(Debug, Deserialize)]
pub struct ImportCaRequest {
    /// PEM-format, concatenated unencrypted private key and
    /// certificate(s)
    pub pem_bundle: String,
}

/// Ids the bundle mapped to
#[derive(Debug, Serialize)]
pub struct ImportCaResponse {
    pub imported_issuers: Vec<String>,
    pub imported_keys: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub existing_issuers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub existing_keys: Vec<String>,
}

/// Import a CA certificate and key bundle
///
/// POST /v1/config/ca — forwarded to the active node in HA.
pub async fn import_ca(
    State(backend): State<Arc<Backend>>,
    Json(request): Json<ImportCaRequest>,
) -> Result<Json<ImportCaResponse>, ApiError> {
    ensure_active(&backend)?;
    let outcome = backend.import_ca_bundle(&request.pem_bundle).await?;
    Ok(Json(ImportCaResponse {
        imported_issuers: outcome.imported_issuers,
        imported_keys: outcome.imported_keys,
        existing_issuers: outcome.existing_issuers,
        existing_keys: outcome.existing_keys,
    }))
}
