//! In-memory storage backend
//!
//! Default backend using an in-memory map. Suitable for development and
//! tests; data is lost on restart. Each `put` swaps the whole value
//! under the write half of the lock, which gives the per-key atomicity
//! the engine relies on.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{Storage, StorageError};

/// In-memory storage implementation
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let mut entries = self.entries.write().unwrap();
        Ok(entries.remove(key).is_some())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_put_delete() {
        let store = MemoryStorage::new();

        assert!(store.get("issuer/abc").await.unwrap().is_none());

        store.put("issuer/abc", b"payload".to_vec()).await.unwrap();
        assert_eq!(
            store.get("issuer/abc").await.unwrap(),
            Some(b"payload".to_vec())
        );

        assert!(store.delete("issuer/abc").await.unwrap());
        assert!(!store.delete("issuer/abc").await.unwrap());
        assert!(store.get("issuer/abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_whole_value() {
        let store = MemoryStorage::new();

        store.put("config/issuers", b"one".to_vec()).await.unwrap();
        store.put("config/issuers", b"two".to_vec()).await.unwrap();

        assert_eq!(
            store.get("config/issuers").await.unwrap(),
            Some(b"two".to_vec())
        );
    }

    #[tokio::test]
    async fn test_list_by_prefix() {
        let store = MemoryStorage::new();

        store.put("issuer/a", vec![1]).await.unwrap();
        store.put("issuer/b", vec![2]).await.unwrap();
        store.put("key/c", vec![3]).await.unwrap();

        let issuers = store.list("issuer/").await.unwrap();
        assert_eq!(issuers.len(), 2);
        assert!(issuers.contains(&"issuer/a".to_string()));
        assert!(issuers.contains(&"issuer/b".to_string()));

        let keys = store.list("key/").await.unwrap();
        assert_eq!(keys, vec!["key/c".to_string()]);
    }
}
