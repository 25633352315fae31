//! sr_proto — Message envelope and hybrid cipher for Saferoom Secure Chat
//!
//! Everything a delivery layer needs to seal and open chat messages:
//! the on-wire envelope (JSON, base64url fields) and the hybrid
//! AES-256-GCM + RSA-OAEP cipher that fills it.
//!
//! # Modules
//! - `envelope` — Encrypted message envelope (what the transport sees)
//! - `cipher`   — Seal/open operations composing the sr_crypto primitives
//! - `error`    — Unified error type
//!
//! The key types are re-exported from `sr_crypto` so most callers depend
//! on this crate alone.

pub mod cipher;
pub mod envelope;
pub mod error;

pub use cipher::{decrypt_message, encrypt_message};
pub use envelope::{DecodedEnvelope, Envelope};
pub use error::CipherError;

pub use sr_crypto::{EncryptionKeyPair, PrivateDecryptionKey, PublicEncryptionKey};
