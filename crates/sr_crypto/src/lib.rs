//! sr_crypto: cryptographic primitives for Saferoom Secure Chat
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited Rust crates.
//! - Zeroize secret material on drop.
//! - Public APIs return opaque newtypes to prevent accidental misuse.
//!
//! # Module layout
//! - `keypair` : RSA-OAEP identity key pair + JWK public-key interchange
//! - `aead`    : AES-256-GCM one-time message key helpers
//! - `error`   : unified error type

pub mod aead;
pub mod error;
pub mod keypair;

pub use error::CryptoError;
pub use keypair::{EncryptionKeyPair, PrivateDecryptionKey, PublicEncryptionKey};
