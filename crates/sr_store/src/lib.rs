//! sr_store — Durable local key store for Saferoom Secure Chat
//!
//! # Storage strategy
//! One SQLite database per profile, holding a single table of named
//! opaque text records.  The identity key pair lives here as two fixed
//! records: the public half as JWK JSON, the private half as base64url
//! PKCS#8 DER.  The private key never appears in any wire format; this
//! database is its only serialised home.
//!
//! Records are stored without additional at-rest encryption.  The
//! database sits inside the user's profile directory and relies on
//! OS-level file permissions.
//!
//! # Migration
//! SQLx migrations in `migrations/` are run on open, so the schema
//! upgrades on first use.

pub mod db;
pub mod error;
pub mod keyring;
pub mod models;

pub use db::KeyStore;
pub use error::StoreError;
pub use keyring::Keyring;
