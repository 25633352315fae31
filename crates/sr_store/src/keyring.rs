//! Keyring: the identity key pair's lifecycle over the durable store.
//!
//! Exactly one pair exists at a time, under fixed record names.  Storing
//! writes both halves in a single transaction, so the store never holds
//! a lone half of a pair.  After `clear` plus a regenerate, envelopes
//! sealed to the old public key are permanently undecipherable; nothing
//! here can bring them back.

use std::path::Path;

use tracing::{debug, info};

use sr_crypto::{EncryptionKeyPair, PrivateDecryptionKey, PublicEncryptionKey};

use crate::db::KeyStore;
use crate::error::StoreError;

/// Record name for the public half (JWK JSON).
pub const PUBLIC_KEY_RECORD: &str = "public_key";
/// Record name for the private half (base64url PKCS#8 DER).
pub const PRIVATE_KEY_RECORD: &str = "private_key";

/// Key manager over a [`KeyStore`].  Cheap to clone.
#[derive(Clone)]
pub struct Keyring {
    store: KeyStore,
}

impl Keyring {
    /// Open (or create) the backing database at `db_path`.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(KeyStore::open(db_path).await?))
    }

    /// Wrap an already-open store.
    pub fn new(store: KeyStore) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// Persist a pair, replacing any previous one wholesale.  Both halves
    /// land in one transaction; on failure the prior state is intact.
    pub async fn store_key_pair(&self, pair: &EncryptionKeyPair) -> Result<(), StoreError> {
        let public_jwk = pair.public.to_jwk_json()?;
        let private_pkcs8 = pair.private().to_pkcs8_b64()?;
        self.store
            .put_many(&[
                (PUBLIC_KEY_RECORD, &public_jwk),
                (PRIVATE_KEY_RECORD, &private_pkcs8),
            ])
            .await?;
        info!("stored identity key pair");
        Ok(())
    }

    /// Load the stored public key; `None` when no pair has been generated.
    /// A record that is present but undecodable is an error, not `None`.
    pub async fn public_key(&self) -> Result<Option<PublicEncryptionKey>, StoreError> {
        match self.store.get(PUBLIC_KEY_RECORD).await? {
            Some(jwk_json) => Ok(Some(PublicEncryptionKey::from_jwk_json(&jwk_json)?)),
            None => Ok(None),
        }
    }

    /// Load the stored private key; `None` when no pair has been generated.
    pub async fn private_key(&self) -> Result<Option<PrivateDecryptionKey>, StoreError> {
        match self.store.get(PRIVATE_KEY_RECORD).await? {
            Some(pkcs8_b64) => Ok(Some(PrivateDecryptionKey::from_pkcs8_b64(&pkcs8_b64)?)),
            None => Ok(None),
        }
    }

    /// Load the full pair; `None` unless both halves are present.  Two
    /// present but mismatched halves are an error.
    pub async fn key_pair(&self) -> Result<Option<EncryptionKeyPair>, StoreError> {
        match (self.public_key().await?, self.private_key().await?) {
            (Some(public), Some(private)) => {
                Ok(Some(EncryptionKeyPair::from_parts(public, private)?))
            }
            _ => Ok(None),
        }
    }

    /// Return the stored pair, generating and persisting a fresh one when
    /// the store has no complete pair.  First use of a new profile lands
    /// here.
    ///
    /// A lone half (interrupted write, external tampering) counts as
    /// missing and is replaced; mismatched halves are surfaced as an
    /// error rather than silently regenerated.
    pub async fn ensure_key_pair(&self) -> Result<EncryptionKeyPair, StoreError> {
        if let Some(pair) = self.key_pair().await? {
            debug!("loaded identity key pair from store");
            return Ok(pair);
        }

        info!("no identity key pair in store, generating");
        let pair = EncryptionKeyPair::generate()?;
        self.store_key_pair(&pair).await?;
        Ok(pair)
    }

    /// Remove every stored record.  Idempotent: clearing an empty keyring
    /// succeeds.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        info!("cleared key store");
        Ok(())
    }
}
