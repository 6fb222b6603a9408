//! Deskwarden configuration.

use crate::crypto::keys::decode_public_key_pem;
use crate::DeskwardenError;
use std::time::Duration;

/// Configuration for license verification, activation and API access.
///
/// Every field is product-specific and expected to be compiled into the
/// deployed application.
#[derive(Debug, Clone)]
pub struct DeskwardenConfig {
    /// Application name (e.g., "servicedesk/2.4.0").
    pub app_name: &'static str,

    /// Vendor Ed25519 public key as an SPKI PEM block.
    /// SECURITY: This should be hard-coded in your application, not from environment.
    pub public_key_pem: &'static str,

    /// Directory name under the platform data dir holding the activation record.
    /// Each installation profile should use a unique namespace.
    pub store_namespace: &'static str,

    /// User-Agent product identifier sent to the service desk API.
    pub user_agent_product: &'static str,

    /// Base URL of the service desk REST API (e.g., "https://desk.example.com").
    pub api_base_url: &'static str,

    /// Per-request timeout for API calls.
    pub request_timeout: Duration,
}

impl DeskwardenConfig {
    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), DeskwardenError> {
        if self.app_name.is_empty() {
            return Err(DeskwardenError::ConfigError(
                "app_name cannot be empty".to_string(),
            ));
        }
        if self.store_namespace.is_empty() {
            return Err(DeskwardenError::ConfigError(
                "store_namespace cannot be empty".to_string(),
            ));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(DeskwardenError::ConfigError(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        decode_public_key_pem(self.public_key_pem).map_err(|e| {
            DeskwardenError::ConfigError(format!("public_key_pem is not usable: {}", e))
        })?;
        Ok(())
    }
}
