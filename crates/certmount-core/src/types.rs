//! Catalog entries and persisted configuration records

use serde::{Deserialize, Serialize};

/// Which kind of catalog entity a reference or error talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Issuer,
    Key,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Issuer => write!(f, "issuer"),
            EntityKind::Key => write!(f, "key"),
        }
    }
}

/// Key algorithm recorded at import time
///
/// Derived from the PEM block tag; bundles with opaque PKCS#8 blocks
/// record `Unspecified` since the inner algorithm is not inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Rsa,
    Ec,
    Unspecified,
}

/// What an issuer may be used for
///
/// This core only records the metadata; enforcement happens in the
/// issuance paths outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssuerUsage {
    ReadOnly,
    IssuingCertificates,
    CrlSigning,
    All,
}

impl Default for IssuerUsage {
    fn default() -> Self {
        IssuerUsage::All
    }
}

/// A stored certificate-authority certificate
///
/// Immutable once created apart from metadata; owned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerEntry {
    /// Opaque identifier (UUID v4 string)
    pub id: String,

    /// Optional unique name; never `"default"`, never UUID-shaped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// PEM-encoded public certificate
    pub certificate: String,

    /// Key backing this issuer, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// Usage metadata
    #[serde(default)]
    pub usage: IssuerUsage,

    /// When this issuer entered the catalog
    pub imported_at: chrono::DateTime<chrono::Utc>,
}

/// A stored private key
///
/// The key material is write-only by design: it is persisted at import
/// and never re-exposed through any read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Opaque identifier (UUID v4 string)
    pub id: String,

    /// Optional unique name; same rules as issuer names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Key algorithm
    pub key_type: KeyType,

    /// PEM-encoded private key material, opaque to this core
    pub private_key: String,

    /// When this key entered the catalog
    pub imported_at: chrono::DateTime<chrono::Utc>,
}

/// Singleton record naming the default issuer, if any
///
/// Persisted as a whole in a single storage operation, so readers see
/// either the old or the new pointer but never a torn one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuersConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_issuer_id: Option<String>,
}

/// Singleton record naming the default key, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_key_id: Option<String>,
}

/// Storage schema state for this mount
///
/// `Legacy` is the pre-multi-issuer single-bundle scheme. The
/// transition to `Migrated` happens exactly once, performed by an
/// external one-time migration procedure, and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    Legacy,
    Migrated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_entry_round_trips() {
        let entry = IssuerEntry {
            id: "f3b9c2ce-8bfe-4b2a-9f3b-0a5c9d6c21aa".into(),
            name: Some("root-ca".into()),
            certificate: "-----BEGIN CERTIFICATE-----\n...\n-----END CERTIFICATE-----\n".into(),
            key_id: None,
            usage: IssuerUsage::All,
            imported_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: IssuerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let config = IssuersConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, "{}");

        let back: IssuersConfig = serde_json::from_str("{}").unwrap();
        assert!(back.default_issuer_id.is_none());
    }

    #[test]
    fn test_migration_state_encoding() {
        assert_eq!(
            serde_json::to_string(&MigrationState::Legacy).unwrap(),
            "\"legacy\""
        );
        assert_eq!(
            serde_json::from_str::<MigrationState>("\"migrated\"").unwrap(),
            MigrationState::Migrated
        );
    }
}
