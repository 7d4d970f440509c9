//! API error types and responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::EngineError;
use crate::ha::ClusterRole;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A write-path request arrived at a node that may not mutate
    /// shared storage; the replication layer must forward it to the
    /// cluster's active node
    #[error("this node is {0}; write operations must be forwarded to the active node")]
    ForwardToActive(ClusterRole),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Engine(err) => match err {
                EngineError::MigrationIncomplete => {
                    (StatusCode::BAD_REQUEST, "MIGRATION_INCOMPLETE")
                }
                EngineError::InvalidReference(_) | EngineError::InvalidName(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_REFERENCE")
                }
                EngineError::ReferenceNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "REFERENCE_NOT_FOUND")
                }
                EngineError::AmbiguousReference { .. } => {
                    (StatusCode::CONFLICT, "AMBIGUOUS_REFERENCE")
                }
                EngineError::DefaultUnset(_) => (StatusCode::BAD_REQUEST, "DEFAULT_UNSET"),
                EngineError::PemBundle(_) => (StatusCode::BAD_REQUEST, "INVALID_PEM_BUNDLE"),
                EngineError::Storage(_) | EngineError::MalformedEntry { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            ApiError::ForwardToActive(_) => {
                (StatusCode::TEMPORARY_REDIRECT, "FORWARD_TO_ACTIVE")
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
