//! License key verification against the embedded vendor public key.
//!
//! Verification answers one question: was this key produced by the holder
//! of the private key? It never consults the clock. Every failure is
//! reported through [`VerificationOutcome`]; nothing here returns an error
//! or panics on untrusted input.

use crate::crypto::keys::decode_public_key_pem;
use crate::crypto::signature::verify_b64;
use crate::protocol::key_format::{check_structure, strip_key};
use crate::protocol::models::{CanonicalClaims, LicenseData, LicenseEnvelope, VerificationOutcome};
use crate::DeskwardenError;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::VerifyingKey;
use tracing::debug;

/// Verify a license key with a PEM-encoded public key.
pub fn verify_license_key(license_key: &str, public_key_pem: &str) -> VerificationOutcome {
    match decode_public_key_pem(public_key_pem) {
        Ok(key) => verify_license_key_with(license_key, &key),
        Err(e) => VerificationOutcome::rejected(e),
    }
}

/// Verify a license key with an already decoded public key.
pub fn verify_license_key_with(license_key: &str, public_key: &VerifyingKey) -> VerificationOutcome {
    match try_verify_license_key(license_key, public_key) {
        Ok(data) => VerificationOutcome::verified(data),
        Err(e) => {
            debug!(error = %e, "license key rejected");
            VerificationOutcome::rejected(e)
        }
    }
}

/// Verify a license key, reporting the failure as a typed error.
///
/// This is the fallible core behind [`verify_license_key_with`], for
/// callers such as the activation handler that branch on the failure kind.
pub fn try_verify_license_key(
    license_key: &str,
    public_key: &VerifyingKey,
) -> Result<LicenseData, DeskwardenError> {
    // 1. Strip transport grouping and check shape before decoding
    let stripped = strip_key(license_key);
    check_structure(&stripped)?;

    // 2. Recover envelope
    let envelope_bytes = STANDARD
        .decode(stripped.as_bytes())
        .map_err(|e| DeskwardenError::DecodeError(format!("Invalid license key base64: {}", e)))?;
    let envelope: LicenseEnvelope = serde_json::from_slice(&envelope_bytes)
        .map_err(|e| DeskwardenError::PayloadError(format!("Invalid license envelope: {}", e)))?;

    // 3. Recover the exact bytes that were signed
    let claims_bytes = STANDARD
        .decode(envelope.data.as_bytes())
        .map_err(|e| DeskwardenError::DecodeError(format!("Invalid license data base64: {}", e)))?;
    let claims_json = std::str::from_utf8(&claims_bytes)
        .map_err(|e| DeskwardenError::DecodeError(format!("License data is not UTF-8: {}", e)))?;

    // 4. Authenticate before trusting any field
    verify_b64(&envelope.signature, claims_json.as_bytes(), public_key)?;

    // 5. Parse claims
    let claims: CanonicalClaims = serde_json::from_str(claims_json)
        .map_err(|e| DeskwardenError::PayloadError(format!("Invalid license claims: {}", e)))?;
    claims.into_license_data()
}

/// Verifier bound to one public key, as embedded in the deployed application.
#[derive(Debug, Clone)]
pub struct LicenseVerifier {
    public_key: VerifyingKey,
}

impl LicenseVerifier {
    /// Build a verifier from an SPKI PEM public key.
    pub fn from_pem(public_key_pem: &str) -> Result<Self, DeskwardenError> {
        Ok(Self {
            public_key: decode_public_key_pem(public_key_pem)?,
        })
    }

    /// Build a verifier from a decoded key.
    pub fn new(public_key: VerifyingKey) -> Self {
        Self { public_key }
    }

    /// Verify a presented license key.
    pub fn verify(&self, license_key: &str) -> VerificationOutcome {
        verify_license_key_with(license_key, &self.public_key)
    }

    /// Verify a presented license key, returning a typed error on failure.
    pub fn try_verify(&self, license_key: &str) -> Result<LicenseData, DeskwardenError> {
        try_verify_license_key(license_key, &self.public_key)
    }

    /// The bound public key.
    pub fn public_key(&self) -> &VerifyingKey {
        &self.public_key
    }
}
