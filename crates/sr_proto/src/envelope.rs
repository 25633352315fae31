//! Encrypted message envelope — the only form a message takes in transit.
//!
//! The delivery layer sees exactly three opaque base64url fields:
//!   - iv            12-byte AES-GCM IV, fresh for this one message
//!   - encryptedKey  one-time AES-256 key, RSA-OAEP-wrapped to the recipient
//!   - ciphertext    AES-256-GCM output with the 16-byte tag appended
//!
//! Without the recipient's private key none of these fields reveal
//! anything about the message. The envelope carries no sender or
//! recipient identity; that metadata belongs to the surrounding message
//! record, not here.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use sr_crypto::aead::{IV_SIZE, TAG_SIZE};
use sr_crypto::keypair::MIN_MODULUS_BITS;

use crate::error::CipherError;

/// Smallest wrapped-key length `decode` accepts, in bytes (2048-bit floor).
const MIN_WRAPPED_KEY_LEN: usize = MIN_MODULUS_BITS / 8;

/// On-wire envelope. JSON member names match the browser client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// AES-GCM IV, base64url.
    pub iv: String,

    /// One-time message key wrapped under the recipient's public key,
    /// base64url.
    pub encrypted_key: String,

    /// AES-256-GCM ciphertext with appended tag, base64url.
    pub ciphertext: String,
}

/// Raw bytes of a structurally valid envelope.
#[derive(Debug)]
pub struct DecodedEnvelope {
    pub iv: [u8; IV_SIZE],
    pub encrypted_key: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope from raw cipher output.
    pub fn new(iv: &[u8; IV_SIZE], encrypted_key: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            iv: URL_SAFE_NO_PAD.encode(iv),
            encrypted_key: URL_SAFE_NO_PAD.encode(encrypted_key),
            ciphertext: URL_SAFE_NO_PAD.encode(ciphertext),
        }
    }

    /// JSON form handed to the delivery layer.
    pub fn to_json(&self) -> Result<String, CipherError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an envelope received from the delivery layer.
    pub fn from_json(json: &str) -> Result<Self, CipherError> {
        serde_json::from_str(json).map_err(|err| CipherError::MalformedEnvelope(err.to_string()))
    }

    /// Validate structure and decode all fields to raw bytes.
    ///
    /// Runs before any cryptographic operation: bad base64, a wrong-length
    /// IV, an undersized wrapped key or a ciphertext too short to carry a
    /// tag are all rejected here without touching any key material.
    pub fn decode(&self) -> Result<DecodedEnvelope, CipherError> {
        let iv = URL_SAFE_NO_PAD
            .decode(&self.iv)
            .map_err(|err| CipherError::MalformedEnvelope(format!("iv: {err}")))?;
        let iv: [u8; IV_SIZE] = iv.try_into().map_err(|bytes: Vec<u8>| {
            CipherError::MalformedEnvelope(format!(
                "iv must be {IV_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;

        let encrypted_key = URL_SAFE_NO_PAD
            .decode(&self.encrypted_key)
            .map_err(|err| CipherError::MalformedEnvelope(format!("encryptedKey: {err}")))?;
        if encrypted_key.len() < MIN_WRAPPED_KEY_LEN {
            return Err(CipherError::MalformedEnvelope(format!(
                "encryptedKey must be at least {MIN_WRAPPED_KEY_LEN} bytes, got {}",
                encrypted_key.len()
            )));
        }

        let ciphertext = URL_SAFE_NO_PAD
            .decode(&self.ciphertext)
            .map_err(|err| CipherError::MalformedEnvelope(format!("ciphertext: {err}")))?;
        if ciphertext.len() < TAG_SIZE {
            return Err(CipherError::MalformedEnvelope(format!(
                "ciphertext must be at least {TAG_SIZE} bytes, got {}",
                ciphertext.len()
            )));
        }

        Ok(DecodedEnvelope {
            iv,
            encrypted_key,
            ciphertext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope::new(&[7u8; IV_SIZE], &[1u8; 256], &[2u8; 48])
    }

    #[test]
    fn new_then_decode_recovers_bytes() {
        let decoded = sample().decode().unwrap();
        assert_eq!(decoded.iv, [7u8; IV_SIZE]);
        assert_eq!(decoded.encrypted_key, vec![1u8; 256]);
        assert_eq!(decoded.ciphertext, vec![2u8; 48]);
    }

    #[test]
    fn json_uses_browser_member_names() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"iv\""));
        assert!(json.contains("\"encryptedKey\""));
        assert!(json.contains("\"ciphertext\""));

        let parsed = Envelope::from_json(&json).unwrap();
        assert_eq!(parsed.encrypted_key, sample().encrypted_key);
    }

    #[test]
    fn from_json_rejects_non_json() {
        assert!(matches!(
            Envelope::from_json("this is not an envelope"),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn from_json_rejects_missing_member() {
        let json = r#"{"iv":"AAAAAAAAAAAAAAAA","ciphertext":"AAAA"}"#;
        assert!(matches!(
            Envelope::from_json(json),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let mut env = sample();
        env.ciphertext = "!!! not base64 !!!".to_string();
        assert!(matches!(
            env.decode(),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn decode_rejects_wrong_iv_length() {
        let mut env = sample();
        env.iv = URL_SAFE_NO_PAD.encode([7u8; 16]);
        assert!(matches!(
            env.decode(),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn decode_rejects_undersized_wrapped_key() {
        let mut env = sample();
        env.encrypted_key = URL_SAFE_NO_PAD.encode([1u8; 32]);
        assert!(matches!(
            env.decode(),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn decode_rejects_ciphertext_shorter_than_tag() {
        let mut env = sample();
        env.ciphertext = URL_SAFE_NO_PAD.encode([2u8; TAG_SIZE - 1]);
        assert!(matches!(
            env.decode(),
            Err(CipherError::MalformedEnvelope(_))
        ));
    }
}
