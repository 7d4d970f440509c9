//! Storage abstraction for the certmount engine
//!
//! This module provides a trait-based abstraction over the physical
//! store, enabling both the in-memory (default) backend and external
//! persistent backends.
//!
//! The store is a flat namespace of opaque byte values. Each get/put is
//! atomic and linearizable on its own key; there are no cross-key
//! transactions. Everything the engine guarantees about pointer
//! consistency is built on exactly that property plus the mount's
//! shared lock.

pub mod memory;

pub use memory::MemoryStorage;

use async_trait::async_trait;
use std::fmt::Debug;

/// Storage key for the default-issuer singleton record
pub const ISSUERS_CONFIG_KEY: &str = "config/issuers";
/// Storage key for the default-key singleton record
pub const KEYS_CONFIG_KEY: &str = "config/keys";
/// Storage key for the migration state record
pub const MIGRATION_KEY: &str = "config/migration";
/// Prefix for issuer catalog entries
pub const ISSUER_PREFIX: &str = "issuer/";
/// Prefix for key catalog entries
pub const KEY_PREFIX: &str = "key/";

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Physical storage backend
///
/// Implementations must be thread-safe and support concurrent access.
/// A `put` replaces the whole value for its key in one atomic step.
#[async_trait]
pub trait Storage: Send + Sync + Debug {
    /// Fetch the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Atomically replace the value stored under `key`
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Remove the value stored under `key`; returns whether it existed
    ///
    /// None of the configuration paths delete records. This is here
    /// for issuer and key removal, which operate on the same catalog
    /// prefixes.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// List all keys beginning with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Fetch and JSON-decode a record, treating an absent key as `None`
pub async fn get_json<T: serde::de::DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
        None => Ok(None),
    }
}

/// JSON-encode and store a record under `key`
pub async fn put_json<T: serde::Serialize>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_vec(value)?;
    storage.put(key, raw).await
}
