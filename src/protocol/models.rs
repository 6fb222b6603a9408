//! License claims, the signed envelope, and verification outcomes.

use crate::DeskwardenError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Date format used for `expires` in signed claims.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Fields a license grants to one customer installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseData {
    /// Licensed company.
    pub company_name: String,

    /// Customer contact address.
    pub contact_email: String,

    /// Expiration date (ISO-8601). The license stops being valid once
    /// 00:00 UTC on this date has passed.
    pub expiration_date: NaiveDate,

    /// Maximum number of active users.
    pub max_users: u32,

    /// Optional feature tags.
    #[serde(default)]
    pub features: BTreeSet<String>,
}

impl LicenseData {
    /// Check the data model invariants.
    ///
    /// Only the seat count is constrained; company and contact are free text.
    pub fn validate(&self) -> Result<(), DeskwardenError> {
        if self.max_users < 1 {
            return Err(DeskwardenError::InvalidLicenseData(
                "max users must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the license carries a feature tag.
    pub fn has_feature(&self, tag: &str) -> bool {
        self.features.contains(tag)
    }
}

/// Signed claim set.
///
/// Field declaration order is the canonical key order; serde_json writes
/// struct fields in declaration order, so signer and verifier agree on bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalClaims {
    /// Company name.
    pub company: String,
    /// Contact e-mail.
    pub email: String,
    /// Expiration date, `YYYY-MM-DD`.
    pub expires: String,
    /// Maximum users.
    pub users: u32,
    /// Feature tags, sorted.
    #[serde(default)]
    pub features: Vec<String>,
}

impl From<&LicenseData> for CanonicalClaims {
    fn from(data: &LicenseData) -> Self {
        Self {
            company: data.company_name.clone(),
            email: data.contact_email.clone(),
            expires: data.expiration_date.format(EXPIRY_FORMAT).to_string(),
            users: data.max_users,
            features: data.features.iter().cloned().collect(),
        }
    }
}

impl CanonicalClaims {
    /// Convert verified claims back into license data.
    ///
    /// `expires` must be a plain `YYYY-MM-DD` date; timestamps are rejected
    /// rather than truncated.
    pub fn into_license_data(self) -> Result<LicenseData, DeskwardenError> {
        let expiration_date = parse_expiry(&self.expires)?;
        let data = LicenseData {
            company_name: self.company,
            contact_email: self.email,
            expiration_date,
            max_users: self.users,
            features: self.features.into_iter().collect(),
        };
        data.validate()
            .map_err(|e| DeskwardenError::PayloadError(e.to_string()))?;
        Ok(data)
    }
}

fn parse_expiry(value: &str) -> Result<NaiveDate, DeskwardenError> {
    // chrono accepts unpadded fields, so also require the exact length.
    if value.len() != 10 {
        return Err(DeskwardenError::PayloadError(format!(
            "invalid expiration date {:?}",
            value
        )));
    }
    NaiveDate::parse_from_str(value, EXPIRY_FORMAT)
        .map_err(|_| DeskwardenError::PayloadError(format!("invalid expiration date {:?}", value)))
}

/// Serialize license data to its canonical JSON string.
pub fn canonical_json(data: &LicenseData) -> Result<String, DeskwardenError> {
    serde_json::to_string(&CanonicalClaims::from(data))
        .map_err(|e| DeskwardenError::PayloadError(format!("Failed to serialize claims: {}", e)))
}

/// The `{data, signature}` envelope inside a license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseEnvelope {
    /// Base64 of the canonical claims JSON.
    pub data: String,
    /// Base64 of the detached signature over the canonical claims JSON.
    pub signature: String,
}

/// Result of checking a presented license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Whether the key is authentic.
    pub valid: bool,

    /// Signed claims, present only when `valid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LicenseData>,

    /// Human-readable failure reason, present only when not `valid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationOutcome {
    /// Successful verification.
    pub fn verified(data: LicenseData) -> Self {
        Self {
            valid: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed verification.
    pub fn rejected(error: impl std::fmt::Display) -> Self {
        Self {
            valid: false,
            data: None,
            error: Some(error.to_string()),
        }
    }

    /// Verified claims, if any.
    pub fn license(&self) -> Option<&LicenseData> {
        if self.valid {
            self.data.as_ref()
        } else {
            None
        }
    }
}
