//! Error types for the certmount engine

use thiserror::Error;

use certmount_core::{CoreError, EntityKind};

use crate::storage::StorageError;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the engine's logical operations
///
/// Every variant becomes a structured error response at the API
/// boundary; nothing here is a fatal process error.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Any operation attempted before the legacy bundle migration ran
    #[error("defaults cannot be read or written until the legacy CA bundle migration has completed")]
    MigrationIncomplete,

    /// Empty reference, or the reserved literal `"default"` where a
    /// concrete reference is required
    #[error("invalid {0} reference: must be non-empty and cannot be \"default\"")]
    InvalidReference(EntityKind),

    /// Reference matched no id and no name
    #[error("unable to resolve {kind} reference {reference:?}: not found")]
    ReferenceNotFound { kind: EntityKind, reference: String },

    /// Reference matched more than one name
    ///
    /// Name uniqueness is enforced at entity creation, so this should
    /// be unreachable; the resolver checks rather than trusting it.
    #[error("{kind} reference {reference:?} is ambiguous: matches more than one entry")]
    AmbiguousReference { kind: EntityKind, reference: String },

    /// The sentinel `"default"` was used but no default is configured
    #[error("no default {0} is currently configured")]
    DefaultUnset(EntityKind),

    /// Underlying get/put failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A persisted record failed to decode
    #[error("malformed {kind} entry {id:?} in storage: {detail}")]
    MalformedEntry {
        kind: EntityKind,
        id: String,
        detail: String,
    },

    /// Entity naming rules violated
    #[error(transparent)]
    InvalidName(CoreError),

    /// The submitted PEM bundle could not be used
    #[error("invalid PEM bundle: {0}")]
    PemBundle(String),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidReference(kind) => EngineError::InvalidReference(kind),
            other @ CoreError::InvalidName { .. } => EngineError::InvalidName(other),
        }
    }
}
