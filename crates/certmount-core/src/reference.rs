//! Reference parsing
//!
//! A reference is a caller-supplied string naming an issuer or key by
//! id, by name, or via the reserved sentinel `"default"`. The string is
//! classified exactly once into a tagged [`Reference`] before any
//! resolution logic runs, so the id/name/sentinel ambiguity is settled
//! in one place.
//!
//! Identifiers are UUID v4 strings and names are forbidden from being
//! UUID-shaped, so the two spaces cannot collide and the tagged parse
//! is lossless with respect to an id-first, name-second lookup order.

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::EntityKind;

/// The reserved reference literal naming the configured default
pub const DEFAULT_SENTINEL: &str = "default";

/// A caller-supplied reference, classified once at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// The sentinel `"default"`: consult the persisted default pointer
    Default,
    /// A UUID-shaped string: look up by identifier
    Id(String),
    /// Anything else non-empty: look up by unique name
    Name(String),
}

impl Reference {
    /// Classify a raw reference string
    ///
    /// Fails with `InvalidReference` on the empty string. The sentinel
    /// is accepted here; write paths that require a concrete reference
    /// must call [`Reference::parse_concrete`] instead.
    pub fn parse(raw: &str, kind: EntityKind) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(CoreError::InvalidReference(kind));
        }
        if raw == DEFAULT_SENTINEL {
            return Ok(Reference::Default);
        }
        if Uuid::parse_str(raw).is_ok() {
            return Ok(Reference::Id(raw.to_string()));
        }
        Ok(Reference::Name(raw.to_string()))
    }

    /// Classify a reference that must point at a concrete entity
    ///
    /// Used by the default-pointer write paths, where the reserved
    /// literal `"default"` is never a valid new value.
    pub fn parse_concrete(raw: &str, kind: EntityKind) -> Result<Self, CoreError> {
        match Self::parse(raw, kind)? {
            Reference::Default => Err(CoreError::InvalidReference(kind)),
            concrete => Ok(concrete),
        }
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Default => write!(f, "{}", DEFAULT_SENTINEL),
            Reference::Id(id) => write!(f, "{}", id),
            Reference::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Validate a proposed entity name
///
/// Names are optional; when present they must be non-empty, must not be
/// the reserved literal `"default"`, and must not be UUID-shaped (which
/// would make a name indistinguishable from an identifier).
pub fn validate_entity_name(name: &str, kind: EntityKind) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::InvalidName {
            kind,
            name: name.to_string(),
            reason: "name cannot be empty".into(),
        });
    }
    if name == DEFAULT_SENTINEL {
        return Err(CoreError::InvalidName {
            kind,
            name: name.to_string(),
            reason: "\"default\" is reserved".into(),
        });
    }
    if Uuid::parse_str(name).is_ok() {
        return Err(CoreError::InvalidName {
            kind,
            name: name.to_string(),
            reason: "name cannot look like an identifier".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_parses_as_default() {
        let parsed = Reference::parse("default", EntityKind::Issuer).unwrap();
        assert_eq!(parsed, Reference::Default);
    }

    #[test]
    fn test_uuid_parses_as_id() {
        let id = Uuid::new_v4().to_string();
        let parsed = Reference::parse(&id, EntityKind::Issuer).unwrap();
        assert_eq!(parsed, Reference::Id(id));
    }

    #[test]
    fn test_plain_string_parses_as_name() {
        let parsed = Reference::parse("root-ca", EntityKind::Key).unwrap();
        assert_eq!(parsed, Reference::Name("root-ca".into()));
    }

    #[test]
    fn test_empty_reference_rejected() {
        let err = Reference::parse("", EntityKind::Issuer).unwrap_err();
        assert_eq!(err, CoreError::InvalidReference(EntityKind::Issuer));
    }

    #[test]
    fn test_concrete_parse_rejects_sentinel() {
        let err = Reference::parse_concrete("default", EntityKind::Key).unwrap_err();
        assert_eq!(err, CoreError::InvalidReference(EntityKind::Key));

        // A concrete name still passes.
        let parsed = Reference::parse_concrete("next", EntityKind::Issuer).unwrap();
        assert_eq!(parsed, Reference::Name("next".into()));
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_entity_name("root-ca", EntityKind::Issuer).is_ok());
        assert!(validate_entity_name("", EntityKind::Issuer).is_err());
        assert!(validate_entity_name("default", EntityKind::Issuer).is_err());
        assert!(
            validate_entity_name(&Uuid::new_v4().to_string(), EntityKind::Issuer).is_err(),
            "UUID-shaped names must be rejected"
        );
    }
}
