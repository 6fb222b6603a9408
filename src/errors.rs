//! Deskwarden error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while issuing, verifying, activating or gating.
#[derive(Debug, Error)]
pub enum DeskwardenError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A PEM key could not be decoded or is of the wrong type.
    #[error("Key error: {0}")]
    KeyError(String),

    /// The signing primitive rejected the input.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// License key does not have the expected structure.
    #[error("Malformed license key: {0}")]
    MalformedKey(String),

    /// Base64 or UTF-8 decoding failed.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// License payload JSON is malformed or missing fields.
    #[error("Invalid license payload: {0}")]
    PayloadError(String),

    /// Signature does not match the signed data.
    #[error("License signature verification failed")]
    SignatureInvalid,

    /// License fields violate the data model.
    #[error("Invalid license data: {0}")]
    InvalidLicenseData(String),

    /// License expiration date has passed.
    #[error("License expired on {expired_on}")]
    LicenseExpired {
        /// Expiration date carried by the license.
        expired_on: NaiveDate,
    },

    /// Creating another user would exceed the licensed seat count.
    #[error("User limit reached ({active_users} of {max_users} users active)")]
    UserLimitExceeded {
        /// Seats granted by the license.
        max_users: u32,
        /// Users currently active.
        active_users: u32,
    },

    /// Caller lacks a required permission.
    #[error("Permission denied: {permission} required")]
    PermissionDenied {
        /// The permission that was required.
        permission: String,
    },

    /// No license has been activated.
    #[error("No license activated")]
    NotActivated,

    /// Activation store I/O error.
    #[error("License store I/O error: {0}")]
    StoreIO(String),

    /// Persisted activation record no longer verifies.
    #[error("License store tampering detected")]
    StoreTampered,

    /// HTTP transport error talking to the service desk API.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unexpected response from the service desk API.
    #[error("Protocol error: {0}")]
    ProtocolError(String),
}
