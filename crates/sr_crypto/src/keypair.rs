//! RSA-OAEP identity key pair.
//!
//! Each user has one `EncryptionKeyPair` (RSA-2048, OAEP with SHA-256).
//! The public half travels to peers as an RFC 7517 JWK; the private half
//! never leaves the device and is serialised (PKCS#8 DER, base64url) only
//! for the local key store.
//!
//! Key-replacement policy
//! ----------------------
//! Pairs are never rotated or versioned.  Storing a new pair replaces the
//! old one wholesale, and envelopes sealed to the old public key become
//! permanently undecipherable.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rsa::{
    pkcs8::{DecodePrivateKey, EncodePrivateKey},
    traits::PublicKeyParts,
    BigUint, Oaep, RsaPrivateKey, RsaPublicKey,
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::aead::KEY_SIZE;
use crate::error::CryptoError;

/// Modulus length for newly generated pairs.
pub const MODULUS_BITS: usize = 2048;
/// Smallest modulus accepted when importing a peer's public key.
pub const MIN_MODULUS_BITS: usize = 2048;
/// Public exponent for generated pairs.
pub const PUBLIC_EXPONENT: u64 = 65537;

const JWK_KTY: &str = "RSA";
const JWK_ALG: &str = "RSA-OAEP-256";

// ── Public JWK ────────────────────────────────────────────────────────────────

/// RFC 7517 JSON Web Key for an RSA public key.
///
/// `n` and `e` are base64url (no padding) big-endian integers.  The
/// optional members are what Web Crypto emits for an RSA-OAEP-256 export,
/// so keys interchange cleanly with browser clients; import tolerates
/// their absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyJwk {
    pub kty: String,
    pub n: String,
    pub e: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,
}

// ── Public encryption key ─────────────────────────────────────────────────────

/// RSA public key usable only to wrap (encrypt) message keys.
///
/// Holding one of these grants encrypt capability and nothing else; an
/// imported public key carries no path to any decrypt operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEncryptionKey(RsaPublicKey);

impl PublicEncryptionKey {
    /// Encrypt a raw 32-byte message key under this public key (OAEP,
    /// SHA-256).  Output length equals the modulus size in bytes.
    pub fn wrap_key(&self, key: &[u8; KEY_SIZE]) -> Result<Vec<u8>, CryptoError> {
        self.0
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), key.as_slice())
            .map_err(|_| CryptoError::KeyWrap)
    }

    /// Modulus length in bits.
    pub fn modulus_bits(&self) -> usize {
        self.0.n().bits()
    }

    /// Length in bytes of a key wrapped under this key.
    pub fn wrapped_key_len(&self) -> usize {
        self.0.size()
    }

    /// Export as a public JWK.
    pub fn to_jwk(&self) -> PublicKeyJwk {
        PublicKeyJwk {
            kty: JWK_KTY.to_string(),
            n: URL_SAFE_NO_PAD.encode(self.0.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(self.0.e().to_bytes_be()),
            alg: Some(JWK_ALG.to_string()),
            ext: Some(true),
            key_ops: Some(vec!["encrypt".to_string()]),
        }
    }

    /// Export as JWK JSON text, the form published to peers.
    pub fn to_jwk_json(&self) -> Result<String, CryptoError> {
        Ok(serde_json::to_string(&self.to_jwk())?)
    }

    /// Import a public JWK, validating key type, algorithm, modulus size
    /// and usage before constructing the key.
    pub fn from_jwk(jwk: &PublicKeyJwk) -> Result<Self, CryptoError> {
        if jwk.kty != JWK_KTY {
            return Err(CryptoError::InvalidKey(format!(
                "Unsupported key type '{}', expected '{JWK_KTY}'",
                jwk.kty
            )));
        }
        if let Some(alg) = &jwk.alg {
            if alg != JWK_ALG {
                return Err(CryptoError::InvalidKey(format!(
                    "Unsupported algorithm '{alg}', expected '{JWK_ALG}'"
                )));
            }
        }
        if let Some(ops) = &jwk.key_ops {
            if !ops.iter().any(|op| op == "encrypt") {
                return Err(CryptoError::InvalidKey(
                    "Key does not permit encryption".into(),
                ));
            }
        }

        let n = BigUint::from_bytes_be(&URL_SAFE_NO_PAD.decode(&jwk.n)?);
        let e = BigUint::from_bytes_be(&URL_SAFE_NO_PAD.decode(&jwk.e)?);
        if n.bits() < MIN_MODULUS_BITS {
            return Err(CryptoError::InvalidKey(format!(
                "Modulus must be at least {MIN_MODULUS_BITS} bits, got {}",
                n.bits()
            )));
        }

        let key = RsaPublicKey::new(n, e).map_err(|err| CryptoError::InvalidKey(err.to_string()))?;
        Ok(Self(key))
    }

    /// Import from JWK JSON text received from a peer.
    pub fn from_jwk_json(json: &str) -> Result<Self, CryptoError> {
        let jwk: PublicKeyJwk =
            serde_json::from_str(json).map_err(|err| CryptoError::InvalidKey(err.to_string()))?;
        Self::from_jwk(&jwk)
    }
}

// ── Private decryption key ────────────────────────────────────────────────────

/// RSA private key for unwrapping message keys.
///
/// Never serialised onto the wire; the only serialised form is the
/// PKCS#8 representation written to the local key store.
#[derive(Clone)]
pub struct PrivateDecryptionKey(RsaPrivateKey);

impl std::fmt::Debug for PrivateDecryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateDecryptionKey([REDACTED])")
    }
}

impl PrivateDecryptionKey {
    /// Decrypt a wrapped message key (OAEP, SHA-256).
    ///
    /// Padding failures and wrong-length results both surface as
    /// `KeyUnwrap`; callers cannot tell them apart.
    pub fn unwrap_key(&self, wrapped: &[u8]) -> Result<Zeroizing<[u8; KEY_SIZE]>, CryptoError> {
        let raw = Zeroizing::new(
            self.0
                .decrypt(Oaep::new::<Sha256>(), wrapped)
                .map_err(|_| CryptoError::KeyUnwrap)?,
        );
        if raw.len() != KEY_SIZE {
            return Err(CryptoError::KeyUnwrap);
        }
        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        key.copy_from_slice(&raw);
        Ok(key)
    }

    /// Length in bytes of any key wrapped for this private key.
    pub fn wrapped_key_len(&self) -> usize {
        self.0.size()
    }

    /// Derive the matching public half.
    pub fn public_key(&self) -> PublicEncryptionKey {
        PublicEncryptionKey(RsaPublicKey::from(&self.0))
    }

    /// Serialise for the local key store: PKCS#8 DER, base64url-encoded.
    pub fn to_pkcs8_b64(&self) -> Result<String, CryptoError> {
        let der = self
            .0
            .to_pkcs8_der()
            .map_err(|err| CryptoError::InvalidKey(err.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(der.as_bytes()))
    }

    /// Reload from the local-store form.
    pub fn from_pkcs8_b64(b64: &str) -> Result<Self, CryptoError> {
        let der = Zeroizing::new(URL_SAFE_NO_PAD.decode(b64)?);
        let key = RsaPrivateKey::from_pkcs8_der(&der)
            .map_err(|err| CryptoError::InvalidKey(err.to_string()))?;
        Ok(Self(key))
    }
}

// ── Key pair ──────────────────────────────────────────────────────────────────

/// The local identity's key pair.
#[derive(Clone)]
pub struct EncryptionKeyPair {
    pub public: PublicEncryptionKey,
    private: PrivateDecryptionKey,
}

impl EncryptionKeyPair {
    /// Generate a fresh pair: RSA-2048, e = 65537, OAEP with SHA-256.
    ///
    /// Failure is fatal; it means the RNG or the RSA backend itself is
    /// unusable, not a state the application can recover from.
    pub fn generate() -> Result<Self, CryptoError> {
        let exp = BigUint::from(PUBLIC_EXPONENT);
        let private = RsaPrivateKey::new_with_exp(&mut OsRng, MODULUS_BITS, &exp)
            .map_err(|err| CryptoError::KeyGeneration(err.to_string()))?;
        let public = PublicEncryptionKey(RsaPublicKey::from(&private));
        Ok(Self {
            public,
            private: PrivateDecryptionKey(private),
        })
    }

    /// Rebuild a pair from stored halves, rejecting mismatched keys.
    pub fn from_parts(
        public: PublicEncryptionKey,
        private: PrivateDecryptionKey,
    ) -> Result<Self, CryptoError> {
        if private.public_key() != public {
            return Err(CryptoError::InvalidKey(
                "Public key does not match private key".into(),
            ));
        }
        Ok(Self { public, private })
    }

    pub fn private(&self) -> &PrivateDecryptionKey {
        &self.private
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    // Key generation dominates test time, so the suite shares two pairs.
    fn test_pair() -> &'static EncryptionKeyPair {
        static PAIR: OnceLock<EncryptionKeyPair> = OnceLock::new();
        PAIR.get_or_init(|| EncryptionKeyPair::generate().expect("generate key pair"))
    }

    fn other_pair() -> &'static EncryptionKeyPair {
        static PAIR: OnceLock<EncryptionKeyPair> = OnceLock::new();
        PAIR.get_or_init(|| EncryptionKeyPair::generate().expect("generate key pair"))
    }

    #[test]
    fn generated_pair_has_expected_parameters() {
        let pair = test_pair();
        assert_eq!(pair.public.modulus_bits(), MODULUS_BITS);
        assert_eq!(pair.public.wrapped_key_len(), MODULUS_BITS / 8);
        assert_eq!(pair.private().wrapped_key_len(), MODULUS_BITS / 8);
    }

    #[test]
    fn wrap_unwrap_roundtrip() {
        let pair = test_pair();
        let key = crate::aead::generate_key();

        let wrapped = pair.public.wrap_key(&key).unwrap();
        assert_eq!(wrapped.len(), pair.private().wrapped_key_len());

        let unwrapped = pair.private().unwrap_key(&wrapped).unwrap();
        assert_eq!(*unwrapped, *key);
    }

    #[test]
    fn unwrap_with_wrong_key_fails() {
        let key = crate::aead::generate_key();
        let wrapped = test_pair().public.wrap_key(&key).unwrap();

        assert!(matches!(
            other_pair().private().unwrap_key(&wrapped),
            Err(CryptoError::KeyUnwrap)
        ));
    }

    #[test]
    fn jwk_export_matches_web_crypto_shape() {
        let jwk = test_pair().public.to_jwk();
        assert_eq!(jwk.kty, "RSA");
        assert!(!jwk.n.is_empty());
        assert_eq!(jwk.e, "AQAB");
        assert_eq!(jwk.alg.as_deref(), Some("RSA-OAEP-256"));
        assert_eq!(jwk.key_ops.as_deref(), Some(&["encrypt".to_string()][..]));
    }

    #[test]
    fn jwk_import_roundtrip() {
        let pair = test_pair();
        let json = pair.public.to_jwk_json().unwrap();
        let imported = PublicEncryptionKey::from_jwk_json(&json).unwrap();
        assert_eq!(imported, pair.public);
    }

    #[test]
    fn jwk_import_accepts_minimal_member_set() {
        let full = test_pair().public.to_jwk();
        let minimal = PublicKeyJwk {
            kty: full.kty,
            n: full.n,
            e: full.e,
            alg: None,
            ext: None,
            key_ops: None,
        };
        let imported = PublicEncryptionKey::from_jwk(&minimal).unwrap();
        assert_eq!(imported, test_pair().public);
    }

    #[test]
    fn jwk_import_rejects_wrong_key_type() {
        let mut jwk = test_pair().public.to_jwk();
        jwk.kty = "EC".to_string();
        assert!(matches!(
            PublicEncryptionKey::from_jwk(&jwk),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn jwk_import_rejects_wrong_algorithm() {
        let mut jwk = test_pair().public.to_jwk();
        jwk.alg = Some("RSA-OAEP".to_string());
        assert!(matches!(
            PublicEncryptionKey::from_jwk(&jwk),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn jwk_import_rejects_small_modulus() {
        let jwk = PublicKeyJwk {
            kty: "RSA".to_string(),
            n: URL_SAFE_NO_PAD.encode([0xFFu8; 64]), // 512-bit modulus
            e: "AQAB".to_string(),
            alg: None,
            ext: None,
            key_ops: None,
        };
        assert!(matches!(
            PublicEncryptionKey::from_jwk(&jwk),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn jwk_import_rejects_non_encrypt_usage() {
        let mut jwk = test_pair().public.to_jwk();
        jwk.key_ops = Some(vec!["sign".to_string()]);
        assert!(matches!(
            PublicEncryptionKey::from_jwk(&jwk),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn pkcs8_roundtrip_preserves_key() {
        let pair = test_pair();
        let stored = pair.private().to_pkcs8_b64().unwrap();
        let reloaded = PrivateDecryptionKey::from_pkcs8_b64(&stored).unwrap();
        assert_eq!(reloaded.public_key(), pair.public);

        let key = crate::aead::generate_key();
        let wrapped = pair.public.wrap_key(&key).unwrap();
        assert_eq!(*reloaded.unwrap_key(&wrapped).unwrap(), *key);
    }

    #[test]
    fn from_parts_rejects_mismatched_halves() {
        let result = EncryptionKeyPair::from_parts(
            test_pair().public.clone(),
            other_pair().private().clone(),
        );
        assert!(matches!(result, Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn debug_output_redacts_private_key() {
        let rendered = format!("{:?}", test_pair().private());
        assert!(rendered.contains("REDACTED"));
    }
}
