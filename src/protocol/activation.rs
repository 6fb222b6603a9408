//! Request/response bodies of the license activation endpoint.

use crate::protocol::models::LicenseData;
use serde::{Deserialize, Serialize};

/// Body posted by the admin UI to activate a license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    /// License key as entered (dash grouping allowed).
    pub license_key: String,
}

/// Activation endpoint reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResponse {
    /// Whether the license was accepted and stored.
    pub success: bool,

    /// Confirmation or rejection reason.
    pub message: String,

    /// Activated license claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseData>,
}

impl ActivationResponse {
    /// Accepted activation.
    pub fn accepted(license: LicenseData) -> Self {
        Self {
            success: true,
            message: format!("License activated for {}", license.company_name),
            license: Some(license),
        }
    }

    /// Rejected activation.
    pub fn rejected(reason: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            message: reason.to_string(),
            license: None,
        }
    }
}
