//! Row models for the `key_store` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named record in the key store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct KeyRecordRow {
    pub name: String,
    /// Opaque text: JWK JSON for the public half, base64url PKCS#8 DER
    /// for the private half.
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
