use thiserror::Error;

/// Storage failures are recoverable from the caller's point of view:
/// nothing here retries internally, and the database is left consistent.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] sr_crypto::CryptoError),
}
