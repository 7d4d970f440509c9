//! CA bundle import
//!
//! Splits a submitted PEM bundle (concatenated certificates and
//! unencrypted private keys) into catalog entries. Certificates become
//! issuers and private-key blocks become keys; anything else is
//! rejected. Blocks already present in the catalog are detected by
//! SHA-256 fingerprint of their DER contents, so re-importing a bundle
//! maps to the existing entries instead of duplicating them.
//!
//! Imported key material is write-only: no read path ever returns it.

use certmount_core::{IssuerEntry, IssuerUsage, KeyEntry, KeyType};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::error::{EngineError, Result};
use crate::storage::Storage;

/// Ids touched by a bundle import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Issuers created by this import, in bundle order
    pub imported_issuers: Vec<String>,
    /// Keys created by this import, in bundle order
    pub imported_keys: Vec<String>,
    /// Issuers that were already in the catalog
    pub existing_issuers: Vec<String>,
    /// Keys that were already in the catalog
    pub existing_keys: Vec<String>,
}

impl ImportOutcome {
    /// All issuer ids the bundle maps to, imported first
    pub fn issuer_ids(&self) -> Vec<String> {
        let mut ids = self.imported_issuers.clone();
        ids.extend(self.existing_issuers.iter().cloned());
        ids
    }

    /// All key ids the bundle maps to, imported first
    pub fn key_ids(&self) -> Vec<String> {
        let mut ids = self.imported_keys.clone();
        ids.extend(self.existing_keys.iter().cloned());
        ids
    }
}

/// A bundle block that passed classification
enum ClassifiedBlock<'a> {
    Certificate(&'a pem::Pem),
    Key(&'a pem::Pem, KeyType),
}

/// Classify every block before anything is persisted
///
/// A bundle with any unusable block is rejected as a whole, so a
/// failing import never leaves earlier blocks behind in the catalog.
fn classify_blocks(blocks: &[pem::Pem]) -> Result<Vec<ClassifiedBlock<'_>>> {
    blocks
        .iter()
        .map(|block| match block.tag() {
            "CERTIFICATE" => Ok(ClassifiedBlock::Certificate(block)),
            "RSA PRIVATE KEY" => Ok(ClassifiedBlock::Key(block, KeyType::Rsa)),
            "EC PRIVATE KEY" => Ok(ClassifiedBlock::Key(block, KeyType::Ec)),
            "PRIVATE KEY" => Ok(ClassifiedBlock::Key(block, KeyType::Unspecified)),
            "ENCRYPTED PRIVATE KEY" => Err(EngineError::PemBundle(
                "bundle contains an encrypted private key; only unencrypted keys are accepted"
                    .into(),
            )),
            other => Err(EngineError::PemBundle(format!(
                "unsupported PEM block type {:?}",
                other
            ))),
        })
        .collect()
}

/// Split a bundle and store its certificates and keys in the catalog
///
/// The whole bundle is classified up front and persisted only once
/// every block is known to be usable: either all of it lands in the
/// catalog or none of it does.
///
/// Callers that also initialize the default pointers must hold the
/// mount's issuers lock around the whole operation; this function only
/// touches catalog entries.
pub async fn import_issuers_and_keys(
    storage: &dyn Storage,
    pem_bundle: &str,
) -> Result<ImportOutcome> {
    let blocks = pem::parse_many(pem_bundle)
        .map_err(|e| EngineError::PemBundle(format!("unable to parse bundle: {}", e)))?;
    if blocks.is_empty() {
        return Err(EngineError::PemBundle("bundle contains no PEM blocks".into()));
    }

    let classified = classify_blocks(&blocks)?;

    let mut outcome = ImportOutcome::default();
    for block in &classified {
        match block {
            ClassifiedBlock::Certificate(block) => {
                import_certificate(storage, block, &mut outcome).await?
            }
            ClassifiedBlock::Key(block, key_type) => {
                import_key(storage, block, *key_type, &mut outcome).await?
            }
        }
    }

    link_lone_key(storage, &outcome).await?;

    info!(
        imported_issuers = outcome.imported_issuers.len(),
        imported_keys = outcome.imported_keys.len(),
        existing_issuers = outcome.existing_issuers.len(),
        existing_keys = outcome.existing_keys.len(),
        "Imported CA bundle"
    );

    Ok(outcome)
}

async fn import_certificate(
    storage: &dyn Storage,
    block: &pem::Pem,
    outcome: &mut ImportOutcome,
) -> Result<()> {
    let print = fingerprint(block.contents());

    for id in catalog::list_issuer_ids(storage).await? {
        let entry = catalog::fetch_issuer_by_id(storage, &id).await?;
        if stored_block_fingerprint(&entry.certificate).as_deref() == Some(&print) {
            outcome.existing_issuers.push(id);
            return Ok(());
        }
    }

    let entry = IssuerEntry {
        id: Uuid::new_v4().to_string(),
        name: None,
        certificate: pem::encode(block),
        key_id: None,
        usage: IssuerUsage::All,
        imported_at: chrono::Utc::now(),
    };
    catalog::store_issuer(storage, &entry).await?;
    outcome.imported_issuers.push(entry.id);
    Ok(())
}

async fn import_key(
    storage: &dyn Storage,
    block: &pem::Pem,
    key_type: KeyType,
    outcome: &mut ImportOutcome,
) -> Result<()> {
    let print = fingerprint(block.contents());

    for id in catalog::list_key_ids(storage).await? {
        let entry = catalog::fetch_key_by_id(storage, &id).await?;
        if stored_block_fingerprint(&entry.private_key).as_deref() == Some(&print) {
            outcome.existing_keys.push(id);
            return Ok(());
        }
    }

    let entry = KeyEntry {
        id: Uuid::new_v4().to_string(),
        name: None,
        key_type,
        private_key: pem::encode(block),
        imported_at: chrono::Utc::now(),
    };
    catalog::store_key(storage, &entry).await?;
    outcome.imported_keys.push(entry.id);
    Ok(())
}

/// Link a bundle's single private key to its leading certificate
///
/// A `config/ca` bundle carries one CA certificate (optionally followed
/// by its chain) and that CA's key. When the bundle maps to exactly one
/// key, attach it to the first certificate that does not already have
/// one.
async fn link_lone_key(storage: &dyn Storage, outcome: &ImportOutcome) -> Result<()> {
    let key_ids = outcome.key_ids();
    if key_ids.len() != 1 {
        if key_ids.len() > 1 {
            warn!(
                keys = key_ids.len(),
                "Bundle carried multiple keys; leaving issuer/key linkage to the operator"
            );
        }
        return Ok(());
    }
    let key_id = &key_ids[0];

    for issuer_id in outcome.issuer_ids() {
        let mut entry = catalog::fetch_issuer_by_id(storage, &issuer_id).await?;
        if entry.key_id.is_none() {
            entry.key_id = Some(key_id.clone());
            catalog::store_issuer(storage, &entry).await?;
            info!(issuer_id = %issuer_id, key_id = %key_id, "Linked imported key to issuer");
            return Ok(());
        }
    }
    Ok(())
}

/// SHA-256 fingerprint of the first PEM block of a stored entry
fn stored_block_fingerprint(stored_pem: &str) -> Option<String> {
    let blocks = pem::parse_many(stored_pem).ok()?;
    blocks.first().map(|b| fingerprint(b.contents()))
}

fn fingerprint(der: &[u8]) -> String {
    let digest = Sha256::digest(der);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
