//! Vendor-side license key generation.
//!
//! Runs in the offline issuing tool only. The private key is used in memory
//! and never written, logged or sent anywhere by this module.

use crate::crypto::keys::decode_signing_key_pem;
use crate::crypto::signature::sign_b64;
use crate::protocol::key_format::format_key;
use crate::protocol::models::{canonical_json, LicenseData, LicenseEnvelope};
use crate::DeskwardenError;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::SigningKey;

/// Produce a signed, dash-grouped license key from a PKCS#8 PEM private key.
///
/// # Errors
/// - `KeyError` if the PEM is malformed or not an Ed25519 private key
/// - `InvalidLicenseData` if `data` violates the data model
pub fn generate_license_key(
    data: &LicenseData,
    private_key_pem: &str,
) -> Result<String, DeskwardenError> {
    let signing_key = decode_signing_key_pem(private_key_pem)?;
    sign_license(data, &signing_key)
}

/// Produce a signed, dash-grouped license key from a decoded signing key.
pub fn sign_license(data: &LicenseData, signing_key: &SigningKey) -> Result<String, DeskwardenError> {
    data.validate()?;

    let claims_json = canonical_json(data)?;
    let signature = sign_b64(claims_json.as_bytes(), signing_key)?;

    let envelope = LicenseEnvelope {
        data: STANDARD.encode(claims_json.as_bytes()),
        signature,
    };
    let envelope_json = serde_json::to_string(&envelope)
        .map_err(|e| DeskwardenError::PayloadError(format!("Failed to serialize envelope: {}", e)))?;

    Ok(format_key(&STANDARD.encode(envelope_json.as_bytes())))
}
