//! API request handlers

pub mod ca;
pub mod issuers;
pub mod keys;

pub use ca::{import_ca, ImportCaRequest, ImportCaResponse};
pub use issuers::{
    read_default_issuer, replace_root, write_default_issuer, ReadDefaultResponse,
    ReplaceRootRequest, WriteDefaultRequest, WriteDefaultResponse,
};
pub use keys::{read_default_key, write_default_key};

use crate::api::error::ApiError;
use crate::backend::Backend;

/// Refuse a write-path request on a node that may not mutate storage
///
/// Read handlers never call this; they are served locally on standbys
/// and secondaries.
pub fn ensure_active(backend: &Backend) -> Result<(), ApiError> {
    if backend.role().can_write() {
        Ok(())
    } else {
        Err(ApiError::ForwardToActive(backend.role()))
    }
}
