//! Mount backend
//!
//! THIS IS THE HEART OF THE ENGINE.
//!
//! The backend is the runtime context of one mounted instance: it owns
//! the storage handle, the cluster role, and the single exclusive lock
//! shared by every path that mutates the default-issuer/default-key
//! pair. The two pointers are a logically paired configuration that
//! signing logic reads together, so one lock covers both; it is a field
//! of this struct, never a package-level global.
//!
//! Every operation follows the same shape: migration check first, then
//! (for writes, under the lock) validate, resolve, persist. A failure
//! at any step leaves the previous pointer value untouched and
//! observable.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::error;

use certmount_core::{EntityKind, Reference};

use crate::catalog;
use crate::config;
use crate::error::Result;
use crate::ha::ClusterRole;
use crate::import::{self, ImportOutcome};
use crate::migration;
use crate::resolver;
use crate::storage::Storage;

/// Issuer name the `root/replace` alias resolves when no explicit
/// reference is supplied
pub const NEXT_ISSUER_NAME: &str = "next";

const ORPHAN_ISSUER_WARNING: &str = "This selected default issuer has no key associated with it. \
     Some operations like issuing certificates and signing CRLs will be unavailable with the \
     requested default issuer until a key is imported or the default issuer is changed.";

/// Result of a default-pointer write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultUpdate {
    /// The resolved canonical id now persisted as the default
    pub id: String,
    /// Non-fatal notice attached to the otherwise-successful response
    pub warning: Option<String>,
}

/// Runtime context of a mounted certmount instance
#[derive(Debug)]
pub struct Backend {
    storage: Arc<dyn Storage>,
    /// Serializes every mutation of the default-issuer/default-key
    /// pair, including bundle import. Reads do not take it.
    issuers_lock: Mutex<()>,
    role: ClusterRole,
}

impl Backend {
    /// Create a backend over the given storage
    pub fn new(storage: Arc<dyn Storage>, role: ClusterRole) -> Self {
        Self {
            storage,
            issuers_lock: Mutex::new(()),
            role,
        }
    }

    /// The physical store backing this mount
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// This node's role within its cluster
    pub fn role(&self) -> ClusterRole {
        self.role
    }

    /// Read the default issuer pointer (`config/issuers` read)
    ///
    /// Lock-free: the singleton is persisted atomically, so a reader
    /// sees a whole pointer even while a write is in flight.
    pub async fn read_default_issuer(&self) -> Result<Option<String>> {
        migration::require_migrated(self.storage()).await?;
        Ok(config::get_issuers_config(self.storage())
            .await?
            .default_issuer_id)
    }

    /// Update the default issuer pointer (`config/issuers` write)
    ///
    /// Selecting an issuer without a key still succeeds, with a
    /// warning: the operator may be mid-way through an import and the
    /// pointer itself is valid. Signing paths stay degraded until a
    /// key shows up.
    pub async fn write_default_issuer(&self, reference: &str) -> Result<DefaultUpdate> {
        let _guard = self.issuers_lock.lock().await;
        migration::require_migrated(self.storage()).await?;

        let parsed = Reference::parse_concrete(reference, EntityKind::Issuer)?;
        let issuer_id = resolver::resolve_issuer(self.storage(), &parsed).await?;

        let entry = catalog::fetch_issuer_by_id(self.storage(), &issuer_id).await?;
        let warning = if entry.key_id.is_none() {
            error!(issuer_id = %issuer_id, "{}", ORPHAN_ISSUER_WARNING);
            Some(ORPHAN_ISSUER_WARNING.to_string())
        } else {
            None
        };

        config::update_default_issuer_id(self.storage(), &issuer_id).await?;

        Ok(DefaultUpdate {
            id: issuer_id,
            warning,
        })
    }

    /// `root/replace`: the `config/issuers` write with the reference
    /// defaulting to the issuer named `"next"`
    pub async fn replace_root(&self, reference: Option<&str>) -> Result<DefaultUpdate> {
        self.write_default_issuer(reference.unwrap_or(NEXT_ISSUER_NAME))
            .await
    }

    /// Read the default key pointer (`config/keys` read)
    pub async fn read_default_key(&self) -> Result<Option<String>> {
        migration::require_migrated(self.storage()).await?;
        Ok(config::get_keys_config(self.storage())
            .await?
            .default_key_id)
    }

    /// Update the default key pointer (`config/keys` write)
    ///
    /// Same flow as the issuer side, same lock instance; a key has no
    /// dependent sub-resource, so there is no orphan warning here.
    pub async fn write_default_key(&self, reference: &str) -> Result<DefaultUpdate> {
        let _guard = self.issuers_lock.lock().await;
        migration::require_migrated(self.storage()).await?;

        let parsed = Reference::parse_concrete(reference, EntityKind::Key)?;
        let key_id = resolver::resolve_key(self.storage(), &parsed).await?;

        config::update_default_key_id(self.storage(), &key_id).await?;

        Ok(DefaultUpdate {
            id: key_id,
            warning: None,
        })
    }

    /// Import a PEM bundle (`config/ca` write)
    ///
    /// Takes the same lock as the pointer writes: while holding it,
    /// the import also initializes both default pointers when they are
    /// unset, and that paired update must be indivisible from a
    /// caller's point of view.
    pub async fn import_ca_bundle(&self, pem_bundle: &str) -> Result<ImportOutcome> {
        let _guard = self.issuers_lock.lock().await;
        migration::require_migrated(self.storage()).await?;

        let outcome = import::import_issuers_and_keys(self.storage(), pem_bundle).await?;

        let issuers_config = config::get_issuers_config(self.storage()).await?;
        if issuers_config.default_issuer_id.is_none() {
            if let Some(first) = outcome.issuer_ids().first() {
                config::update_default_issuer_id(self.storage(), first).await?;
            }
        }

        let keys_config = config::get_keys_config(self.storage()).await?;
        if keys_config.default_key_id.is_none() {
            if let Some(first) = outcome.key_ids().first() {
                config::update_default_key_id(self.storage(), first).await?;
            }
        }

        Ok(outcome)
    }

    /// Record the effect of the external one-time migration procedure
    pub async fn complete_migration(&self) -> Result<()> {
        migration::mark_migrated(self.storage()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store_issuer;
    use crate::error::EngineError;
    use crate::storage::MemoryStorage;
    use certmount_core::{IssuerEntry, IssuerUsage};
    use uuid::Uuid;

    async fn migrated_backend() -> Backend {
        let backend = Backend::new(Arc::new(MemoryStorage::new()), ClusterRole::Active);
        backend.complete_migration().await.unwrap();
        backend
    }

    fn issuer(id: &str, name: Option<&str>, key_id: Option<&str>) -> IssuerEntry {
        IssuerEntry {
            id: id.to_string(),
            name: name.map(String::from),
            certificate: "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n".into(),
            key_id: key_id.map(String::from),
            usage: IssuerUsage::All,
            imported_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_legacy_mount_blocks_everything() {
        let backend = Backend::new(Arc::new(MemoryStorage::new()), ClusterRole::Active);

        assert!(matches!(
            backend.read_default_issuer().await.unwrap_err(),
            EngineError::MigrationIncomplete
        ));
        assert!(matches!(
            backend.write_default_issuer("root-ca").await.unwrap_err(),
            EngineError::MigrationIncomplete
        ));
        assert!(matches!(
            backend.read_default_key().await.unwrap_err(),
            EngineError::MigrationIncomplete
        ));
        assert!(matches!(
            backend.write_default_key("some-key").await.unwrap_err(),
            EngineError::MigrationIncomplete
        ));
        assert!(matches!(
            backend.import_ca_bundle("x").await.unwrap_err(),
            EngineError::MigrationIncomplete
        ));

        // The guard fails before any side effect.
        assert!(backend
            .storage()
            .list("issuer/")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read_default_issuer() {
        let backend = migrated_backend().await;
        let id = Uuid::new_v4().to_string();
        store_issuer(
            backend.storage(),
            &issuer(&id, Some("root-ca"), Some("key1")),
        )
        .await
        .unwrap();

        let update = backend.write_default_issuer("root-ca").await.unwrap();
        assert_eq!(update.id, id);
        assert!(update.warning.is_none());

        assert_eq!(backend.read_default_issuer().await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn test_orphan_issuer_write_succeeds_with_warning() {
        let backend = migrated_backend().await;
        let id = Uuid::new_v4().to_string();
        store_issuer(backend.storage(), &issuer(&id, Some("orphan-ca"), None))
            .await
            .unwrap();

        let update = backend.write_default_issuer("orphan-ca").await.unwrap();
        assert_eq!(update.id, id);
        assert!(update.warning.is_some());

        // The pointer still moved.
        assert_eq!(backend.read_default_issuer().await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn test_invalid_reference_leaves_pointer_unchanged() {
        let backend = migrated_backend().await;
        let id = Uuid::new_v4().to_string();
        store_issuer(backend.storage(), &issuer(&id, Some("root-ca"), Some("k")))
            .await
            .unwrap();
        backend.write_default_issuer("root-ca").await.unwrap();

        for bad in ["", "default"] {
            assert!(matches!(
                backend.write_default_issuer(bad).await.unwrap_err(),
                EngineError::InvalidReference(EntityKind::Issuer)
            ));
        }
        assert!(matches!(
            backend.write_default_issuer("missing").await.unwrap_err(),
            EngineError::ReferenceNotFound { .. }
        ));

        assert_eq!(backend.read_default_issuer().await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn test_replace_root_defaults_to_next() {
        let backend = migrated_backend().await;
        let next_id = Uuid::new_v4().to_string();
        store_issuer(
            backend.storage(),
            &issuer(&next_id, Some("next"), Some("key1")),
        )
        .await
        .unwrap();

        let update = backend.replace_root(None).await.unwrap();
        assert_eq!(update.id, next_id);
        assert_eq!(backend.read_default_issuer().await.unwrap(), Some(next_id));
    }

    #[tokio::test]
    async fn test_replace_root_without_next_issuer_fails() {
        let backend = migrated_backend().await;
        assert!(matches!(
            backend.replace_root(None).await.unwrap_err(),
            EngineError::ReferenceNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_import_initializes_unset_defaults() {
        let backend = migrated_backend().await;
        let bundle = format!(
            "{}{}",
            pem::encode(&pem::Pem::new("CERTIFICATE", b"ca".to_vec())),
            pem::encode(&pem::Pem::new("RSA PRIVATE KEY", b"key".to_vec())),
        );

        let outcome = backend.import_ca_bundle(&bundle).await.unwrap();

        assert_eq!(
            backend.read_default_issuer().await.unwrap().as_ref(),
            outcome.imported_issuers.first()
        );
        assert_eq!(
            backend.read_default_key().await.unwrap().as_ref(),
            outcome.imported_keys.first()
        );
    }

    #[tokio::test]
    async fn test_import_leaves_existing_defaults_alone() {
        let backend = migrated_backend().await;
        let id = Uuid::new_v4().to_string();
        store_issuer(backend.storage(), &issuer(&id, Some("root-ca"), Some("k")))
            .await
            .unwrap();
        backend.write_default_issuer("root-ca").await.unwrap();

        let bundle = pem::encode(&pem::Pem::new("CERTIFICATE", b"other-ca".to_vec()));
        backend.import_ca_bundle(&bundle).await.unwrap();

        assert_eq!(backend.read_default_issuer().await.unwrap(), Some(id));
    }
}
