//! Default-pointer configuration store
//!
//! Two persisted singleton records: the default issuer pointer and the
//! default key pointer. Each is read and written as a whole in one
//! storage operation; an absent record reads as the unset default.
//!
//! Readers of these records never take the mount lock. They may see a
//! pointer that is stale relative to an in-flight write, but never a
//! torn one.

use certmount_core::{IssuersConfig, KeysConfig};
use tracing::info;

use crate::error::Result;
use crate::storage::{get_json, put_json, Storage, ISSUERS_CONFIG_KEY, KEYS_CONFIG_KEY};

/// Load the default-issuer config, defaulting to unset
pub async fn get_issuers_config(storage: &dyn Storage) -> Result<IssuersConfig> {
    Ok(get_json::<IssuersConfig>(storage, ISSUERS_CONFIG_KEY)
        .await?
        .unwrap_or_default())
}

/// Load the default-key config, defaulting to unset
pub async fn get_keys_config(storage: &dyn Storage) -> Result<KeysConfig> {
    Ok(get_json::<KeysConfig>(storage, KEYS_CONFIG_KEY)
        .await?
        .unwrap_or_default())
}

/// Persist a new default issuer id
///
/// Callers must hold the mount's issuers lock.
pub async fn update_default_issuer_id(storage: &dyn Storage, issuer_id: &str) -> Result<()> {
    let config = IssuersConfig {
        default_issuer_id: Some(issuer_id.to_string()),
    };
    put_json(storage, ISSUERS_CONFIG_KEY, &config).await?;
    info!(issuer_id = %issuer_id, "Updated default issuer");
    Ok(())
}

/// Persist a new default key id
///
/// Callers must hold the mount's issuers lock.
pub async fn update_default_key_id(storage: &dyn Storage, key_id: &str) -> Result<()> {
    let config = KeysConfig {
        default_key_id: Some(key_id.to_string()),
    };
    put_json(storage, KEYS_CONFIG_KEY, &config).await?;
    info!(key_id = %key_id, "Updated default key");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_absent_config_reads_as_unset() {
        let store = MemoryStorage::new();

        assert!(get_issuers_config(&store)
            .await
            .unwrap()
            .default_issuer_id
            .is_none());
        assert!(get_keys_config(&store)
            .await
            .unwrap()
            .default_key_id
            .is_none());
    }

    #[tokio::test]
    async fn test_update_and_read_back() {
        let store = MemoryStorage::new();

        update_default_issuer_id(&store, "iss1").await.unwrap();
        update_default_key_id(&store, "key1").await.unwrap();

        assert_eq!(
            get_issuers_config(&store).await.unwrap().default_issuer_id,
            Some("iss1".to_string())
        );
        assert_eq!(
            get_keys_config(&store).await.unwrap().default_key_id,
            Some("key1".to_string())
        );

        update_default_issuer_id(&store, "iss2").await.unwrap();
        assert_eq!(
            get_issuers_config(&store).await.unwrap().default_issuer_id,
            Some("iss2".to_string())
        );
    }
}
