//! Ed25519 detached signatures over license payload bytes.

use crate::DeskwardenError;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

/// Sign `data` and return the base64-encoded signature.
pub fn sign_b64(data: &[u8], signing_key: &SigningKey) -> Result<String, DeskwardenError> {
    let signature = signing_key
        .try_sign(data)
        .map_err(|e| DeskwardenError::SigningFailed(e.to_string()))?;
    Ok(STANDARD.encode(signature.to_bytes()))
}

/// Verify a base64-encoded Ed25519 signature over `data`.
pub fn verify_b64(
    signature_b64: &str,
    data: &[u8],
    verifying_key: &VerifyingKey,
) -> Result<(), DeskwardenError> {
    let sig_bytes = STANDARD
        .decode(signature_b64)
        .map_err(|e| DeskwardenError::DecodeError(format!("Invalid signature base64: {}", e)))?;

    let sig_array: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| DeskwardenError::SignatureInvalid)?;

    let signature = Signature::from_bytes(&sig_array);

    verifying_key
        .verify_strict(data, &signature)
        .map_err(|_| DeskwardenError::SignatureInvalid)
}
