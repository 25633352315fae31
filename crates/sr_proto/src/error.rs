use thiserror::Error;

use sr_crypto::CryptoError;

/// Errors surfaced by sealing and unsealing messages.
///
/// Decrypt-side failures are deliberately coarse: every way a wrapped key
/// can fail to unwrap collapses into `KeyMismatch`, so callers cannot
/// probe OAEP padding behaviour through the error value.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Key mismatch: envelope was not sealed to this key pair")]
    KeyMismatch,

    #[error("Authentication failed: ciphertext or IV was altered in transit")]
    AuthenticationFailed,

    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Encryption failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}
