//! certmount engine
//!
//! The issuer/key configuration core of a certificate-authority
//! secrets engine. It manages CA certificates ("issuers") and private
//! keys as individually addressable catalog entries, resolves
//! human-supplied references (name, identifier, or the sentinel
//! `"default"`) to canonical ids, and maintains the persisted default
//! issuer/key pointers that every downstream signing operation
//! consults.
//!
//! ## Guarantees
//!
//! - One exclusive lock, owned by the mount [`Backend`], serializes
//!   every mutation of the default-issuer/default-key pair. Readers
//!   skip the lock and can observe a stale pointer but never a torn
//!   one.
//! - Nothing is readable or writable until the one-way legacy bundle
//!   migration has completed.
//! - Imported private key material is never re-exposed.
//!
//! ## API Endpoints
//!
//! - `GET /health`, `GET /ready` - liveness and readiness
//! - `GET/POST /v1/config/issuers` - read/set the default issuer
//! - `POST /v1/root/replace` - promote the issuer named `"next"`
//! - `GET/POST /v1/config/keys` - read/set the default key
//! - `POST /v1/config/ca` - import a PEM CA bundle (write-only)
//!
//! Write endpoints are forwarded to the cluster's active node in HA.

pub mod api;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ha;
pub mod import;
pub mod migration;
pub mod resolver;
pub mod storage;

pub use api::create_router;
pub use backend::{Backend, DefaultUpdate, NEXT_ISSUER_NAME};
pub use error::{EngineError, Result};
pub use ha::ClusterRole;
pub use import::ImportOutcome;
pub use storage::{MemoryStorage, Storage, StorageError};
