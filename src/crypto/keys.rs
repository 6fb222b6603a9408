//! Ed25519 key handling in PEM form.
//!
//! Private keys travel as PKCS#8 PEM (`BEGIN PRIVATE KEY`), public keys as
//! SPKI PEM (`BEGIN PUBLIC KEY`).

use crate::DeskwardenError;
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use ed25519_dalek::{SigningKey, VerifyingKey};
use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;

/// Cache for decoded verifying keys, keyed by PEM text.
static KEY_CACHE: OnceCell<RwLock<HashMap<String, VerifyingKey>>> = OnceCell::new();

/// Decode a PKCS#8 PEM Ed25519 private key.
///
/// The error never includes key material.
pub fn decode_signing_key_pem(pem: &str) -> Result<SigningKey, DeskwardenError> {
    SigningKey::from_pkcs8_pem(pem.trim())
        .map_err(|e| DeskwardenError::KeyError(format!("Invalid Ed25519 private key PEM: {}", e)))
}

/// Decode an SPKI PEM Ed25519 public key.
///
/// The key is cached after first decode.
pub fn decode_public_key_pem(pem: &str) -> Result<VerifyingKey, DeskwardenError> {
    let cache = KEY_CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    if let Ok(guard) = cache.read() {
        if let Some(key) = guard.get(pem) {
            return Ok(*key);
        }
    }

    let verifying_key = VerifyingKey::from_public_key_pem(pem.trim())
        .map_err(|e| DeskwardenError::KeyError(format!("Invalid Ed25519 public key PEM: {}", e)))?;

    // Best-effort insert. If locking fails, still return the decoded key.
    if let Ok(mut guard) = cache.write() {
        guard.insert(pem.to_string(), verifying_key);
    }

    Ok(verifying_key)
}

/// Hex SHA-256 fingerprint of a public key's raw bytes.
pub fn fingerprint(key: &VerifyingKey) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// A freshly generated vendor key pair.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new key pair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Wrap an existing signing key.
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// The signing half.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// The verifying half.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Encode the private key as PKCS#8 PEM.
    pub fn private_key_pem(&self) -> Result<String, DeskwardenError> {
        let pem = self
            .signing_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| DeskwardenError::KeyError(format!("Failed to encode private key: {}", e)))?;
        Ok(pem.as_str().to_owned())
    }

    /// Encode the public key as SPKI PEM.
    pub fn public_key_pem(&self) -> Result<String, DeskwardenError> {
        self.verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| DeskwardenError::KeyError(format!("Failed to encode public key: {}", e)))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("fingerprint", &fingerprint(&self.verifying_key()))
            .finish_non_exhaustive()
    }
}
