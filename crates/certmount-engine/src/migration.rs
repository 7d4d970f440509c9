//! Migration guard
//!
//! A mount starts in the legacy single-bundle scheme and is upgraded to
//! the multi-issuer catalog exactly once by an external one-time
//! procedure. Until that happens, every configuration endpoint fails
//! fast with `MigrationIncomplete` before touching any other storage.
//!
//! The state is a persisted record rather than something re-derived
//! from the shape of storage on every call; an absent record means a
//! fresh, pre-migration mount.

use certmount_core::MigrationState;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::storage::{get_json, put_json, Storage, MIGRATION_KEY};

/// Read the current migration state
pub async fn migration_state(storage: &dyn Storage) -> Result<MigrationState> {
    Ok(get_json::<MigrationState>(storage, MIGRATION_KEY)
        .await?
        .unwrap_or(MigrationState::Legacy))
}

/// Fail with `MigrationIncomplete` unless the mount has been migrated
///
/// Idempotent and side-effect free; safe to call from any handler
/// before touching storage.
pub async fn require_migrated(storage: &dyn Storage) -> Result<()> {
    match migration_state(storage).await? {
        MigrationState::Migrated => Ok(()),
        MigrationState::Legacy => Err(EngineError::MigrationIncomplete),
    }
}

/// Record the one-way transition to the multi-issuer scheme
///
/// Invoked by the external migration procedure once it has rewritten
/// the legacy bundle. Calling it again is a no-op; there is no reverse
/// transition.
pub async fn mark_migrated(storage: &dyn Storage) -> Result<()> {
    if migration_state(storage).await? == MigrationState::Migrated {
        return Ok(());
    }
    put_json(storage, MIGRATION_KEY, &MigrationState::Migrated).await?;
    info!("Legacy CA bundle migration marked complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_fresh_mount_is_legacy() {
        let store = MemoryStorage::new();
        assert_eq!(
            migration_state(&store).await.unwrap(),
            MigrationState::Legacy
        );
        assert!(matches!(
            require_migrated(&store).await.unwrap_err(),
            EngineError::MigrationIncomplete
        ));
    }

    #[tokio::test]
    async fn test_mark_migrated_is_one_way_and_idempotent() {
        let store = MemoryStorage::new();

        mark_migrated(&store).await.unwrap();
        assert_eq!(
            migration_state(&store).await.unwrap(),
            MigrationState::Migrated
        );
        require_migrated(&store).await.unwrap();

        // Second call changes nothing.
        mark_migrated(&store).await.unwrap();
        assert_eq!(
            migration_state(&store).await.unwrap(),
            MigrationState::Migrated
        );
    }
}
