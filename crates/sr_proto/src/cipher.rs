//! Hybrid message cipher — one-time AES-256-GCM keys wrapped with RSA-OAEP.
//!
//! Every message is sealed under a fresh 256-bit AES key and a fresh
//! 12-byte IV; the key is then wrapped to the recipient's public key and
//! travels inside the envelope. Compromising one message key exposes
//! exactly one message.
//!
//! Both operations are stateless. Nothing is persisted, concurrent calls
//! never share key material, and a failed send can simply be retried.

use sr_crypto::aead;
use sr_crypto::{PrivateDecryptionKey, PublicEncryptionKey};

use crate::envelope::Envelope;
use crate::error::CipherError;

/// Seal a plaintext message for `recipient`.
///
/// 1. Generate a one-time AES-256 key.
/// 2. Generate a 12-byte IV.
/// 3. AES-GCM-encrypt the UTF-8 bytes of `plaintext`.
/// 4. RSA-OAEP-wrap the raw AES key under the recipient's public key.
/// 5. Assemble the envelope.
pub fn encrypt_message(
    recipient: &PublicEncryptionKey,
    plaintext: &str,
) -> Result<Envelope, CipherError> {
    let key = aead::generate_key();
    let iv = aead::generate_iv();
    let ciphertext = aead::encrypt(&key, &iv, plaintext.as_bytes())?;
    let encrypted_key = recipient.wrap_key(&key)?;
    Ok(Envelope::new(&iv, &encrypted_key, &ciphertext))
}

/// Open an envelope with the local private key. Exact inverse of
/// [`encrypt_message`], and all-or-nothing: no partial plaintext ever
/// escapes a failure path.
///
/// 1. Structural validation (`MalformedEnvelope`, before any crypto).
/// 2. Wrapped-key length against the private key's modulus (`KeyMismatch`).
/// 3. RSA-OAEP unwrap of the message key (`KeyMismatch` on failure).
/// 4. AES-GCM decrypt with tag verification (`AuthenticationFailed`).
/// 5. UTF-8 decode of the plaintext (`Encoding`).
pub fn decrypt_message(
    private: &PrivateDecryptionKey,
    envelope: &Envelope,
) -> Result<String, CipherError> {
    let decoded = envelope.decode()?;

    if decoded.encrypted_key.len() != private.wrapped_key_len() {
        return Err(CipherError::KeyMismatch);
    }
    let key = private
        .unwrap_key(&decoded.encrypted_key)
        .map_err(|_| CipherError::KeyMismatch)?;

    let plaintext = aead::decrypt(&key, &decoded.iv, &decoded.ciphertext)
        .map_err(|_| CipherError::AuthenticationFailed)?;

    Ok(String::from_utf8(plaintext.to_vec())?)
}
