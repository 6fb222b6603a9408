//! Activation record format.
//!
//! On load we:
//! 1. Check the stored fingerprint matches the stored key
//! 2. Re-verify the key's signature (required)
//! 3. Reject activation timestamps from the future

use crate::clock::Clock;
use crate::license::verify::LicenseVerifier;
use crate::protocol::key_format::strip_key;
use crate::protocol::models::LicenseData;
use crate::DeskwardenError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Persisted activation of one license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRecord {
    /// License key as activated, grouping removed.
    pub license_key: String,

    /// SHA-256 hex of `license_key`.
    pub key_fingerprint: String,

    /// When the key was activated.
    pub activated_at: DateTime<Utc>,
}

impl ActivationRecord {
    /// Create a record for a key activated now.
    pub fn new(license_key: &str, clock: &dyn Clock) -> Self {
        let license_key = strip_key(license_key);
        Self {
            key_fingerprint: hash_license_key(&license_key),
            license_key,
            activated_at: clock.now_utc(),
        }
    }

    /// Serialize the record to JSON.
    pub fn to_json(&self) -> Result<String, DeskwardenError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DeskwardenError::StoreIO(format!("Failed to serialize record: {}", e)))
    }

    /// Deserialize a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, DeskwardenError> {
        serde_json::from_str(json)
            .map_err(|e| DeskwardenError::StoreIO(format!("Failed to deserialize record: {}", e)))
    }

    /// Re-verify the stored key and return its claims.
    ///
    /// Any mismatch is reported as `StoreTampered`.
    pub fn verify(
        &self,
        verifier: &LicenseVerifier,
        clock: &dyn Clock,
    ) -> Result<LicenseData, DeskwardenError> {
        if hash_license_key(&self.license_key) != self.key_fingerprint {
            return Err(DeskwardenError::StoreTampered);
        }

        let data = verifier
            .verify(&self.license_key)
            .license()
            .cloned()
            .ok_or(DeskwardenError::StoreTampered)?;

        if self.activated_at > clock.now_utc() {
            return Err(DeskwardenError::StoreTampered);
        }

        Ok(data)
    }

    /// Short fingerprint safe for logs.
    pub fn short_fingerprint(&self) -> &str {
        &self.key_fingerprint[..12.min(self.key_fingerprint.len())]
    }
}

/// SHA-256 hex of a license key, so logs and records never need the raw key.
pub fn hash_license_key(license_key: &str) -> String {
    hex::encode(Sha256::digest(strip_key(license_key).as_bytes()))
}
