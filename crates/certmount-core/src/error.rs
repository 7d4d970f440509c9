//! Error types for the certmount domain model

use thiserror::Error;

use crate::types::EntityKind;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Validation errors raised by the pure domain model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Reference was empty or the reserved literal `"default"` where a
    /// concrete reference is required
    #[error("invalid {0} reference: must be non-empty and cannot be \"default\"")]
    InvalidReference(EntityKind),

    /// Entity name failed the naming rules
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: EntityKind,
        name: String,
        reason: String,
    },
}
