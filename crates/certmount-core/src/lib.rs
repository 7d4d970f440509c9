//! Domain types for the certmount CA secrets engine
//!
//! This crate holds the pure data model shared by the engine:
//!
//! - Issuer and key catalog entries
//! - The singleton default-pointer configuration records
//! - The storage migration state
//! - Reference parsing (`"default"` sentinel vs. id vs. name)
//!
//! No I/O lives here; the engine crate layers storage and HTTP on top.

pub mod error;
pub mod reference;
pub mod types;

pub use error::{CoreError, Result};
pub use reference::{validate_entity_name, Reference, DEFAULT_SENTINEL};
pub use types::{
    EntityKind, IssuerEntry, IssuerUsage, IssuersConfig, KeyEntry, KeyType, KeysConfig,
    MigrationState,
};
