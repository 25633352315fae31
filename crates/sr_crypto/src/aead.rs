//! Authenticated encryption with AES-256-GCM.
//!
//! Key size: 32 bytes.  IV: 12 bytes (random).  Tag: 16 bytes, appended
//! to the ciphertext in the cipher's canonical layout.
//!
//! The IV is NOT prepended to the ciphertext here; envelopes carry it as a
//! separate field, so callers pass it to both `encrypt` and `decrypt`.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;
/// GCM initialisation vector length in bytes.
pub const IV_SIZE: usize = 12;
/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Generate a fresh one-time 32-byte message key from the OS CSPRNG.
pub fn generate_key() -> Zeroizing<[u8; KEY_SIZE]> {
    let key = Aes256Gcm::generate_key(&mut AeadOsRng);
    Zeroizing::new(key.into())
}

/// Generate a fresh 12-byte IV from the OS CSPRNG.
///
/// A repeated (key, IV) pair breaks GCM confidentiality; the OS CSPRNG is
/// the only IV source, never a counter or a derived value.
pub fn generate_iv() -> [u8; IV_SIZE] {
    let nonce = Aes256Gcm::generate_nonce(&mut AeadOsRng);
    nonce.into()
}

/// Encrypt `plaintext` under `key` and `iv`.
pub fn encrypt(
    key: &[u8; KEY_SIZE],
    iv: &[u8; IV_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::AeadEncrypt)?;
    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|_| CryptoError::AeadEncrypt)
}

/// Decrypt ciphertext+tag bytes.  All-or-nothing: a failed tag check
/// yields an error and no plaintext.
pub fn decrypt(
    key: &[u8; KEY_SIZE],
    iv: &[u8; IV_SIZE],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::AeadDecrypt);
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::AeadDecrypt)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| CryptoError::AeadDecrypt)?;
    Ok(Zeroizing::new(plaintext))
}
