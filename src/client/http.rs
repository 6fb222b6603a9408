//! Reqwest-based client for the service desk API.
//!
//! Fetches the two snapshots the gating layer evaluates (settings and the
//! signed-in user's permissions) and posts license activations. The
//! snapshots are independent; fetch and cache them in any order.

use crate::config::DeskwardenConfig;
use crate::permissions::UserPermissions;
use crate::protocol::activation::{ActivationRequest, ActivationResponse};
use crate::settings::Settings;
use crate::DeskwardenError;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Path of the license activation endpoint.
pub const ACTIVATE_PATH: &str = "/api/license/activate";
/// Path of the settings snapshot endpoint.
pub const SETTINGS_PATH: &str = "/api/settings";
/// Path of the authenticated-user endpoint.
pub const ME_PATH: &str = "/api/auth/me";

/// Authenticated-user payload; only the permission record is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeResponse {
    /// Permission record, `null` when no role resolves.
    #[serde(default)]
    pub permissions: Option<UserPermissions>,
}

/// Service desk API client.
pub struct DeskClient {
    client: Client,
    user_agent: String,
    base_url: String,
    session_token: Option<String>,
}

impl DeskClient {
    /// Create a new client from config.
    pub fn new(config: &DeskwardenConfig) -> Result<Self, DeskwardenError> {
        let client = build_http_client(config.request_timeout)?;

        Ok(Self {
            client,
            user_agent: build_user_agent(config),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session_token: None,
        })
    }

    /// Attach a session bearer token to every request.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Replace the request timeout.
    pub fn try_with_timeout(mut self, timeout: Duration) -> Result<Self, DeskwardenError> {
        self.client = build_http_client(timeout)?;
        Ok(self)
    }

    /// Post a license key to the activation endpoint.
    ///
    /// A rejection is returned as `Ok` with `success == false` when the
    /// server explains it in the body.
    pub fn activate_license(&self, license_key: &str) -> Result<ActivationResponse, DeskwardenError> {
        let request = ActivationRequest {
            license_key: license_key.to_string(),
        };
        let response = self
            .prepare(self.client.post(self.url(ACTIVATE_PATH)))
            .json(&request)
            .send()
            .map_err(|e| DeskwardenError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = read_body(response)?;
        match serde_json::from_slice::<ActivationResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(DeskwardenError::Transport(format!(
                "Activation endpoint returned {}",
                status
            ))),
            Err(e) => Err(DeskwardenError::ProtocolError(format!(
                "Invalid activation response: {}",
                e
            ))),
        }
    }

    /// Fetch the settings snapshot.
    pub fn fetch_settings(&self) -> Result<Settings, DeskwardenError> {
        self.get_json(SETTINGS_PATH)
    }

    /// Fetch the signed-in user's permission record.
    ///
    /// `Ok(None)` means no record; treat it as all permissions false.
    pub fn fetch_permissions(&self) -> Result<Option<UserPermissions>, DeskwardenError> {
        let me: MeResponse = self.get_json(ME_PATH)?;
        Ok(me.permissions)
    }

    /// Build the full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json");
        match &self.session_token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeskwardenError> {
        debug!(path, "fetching snapshot");
        let response = self
            .prepare(self.client.get(self.url(path)))
            .send()
            .map_err(|e| DeskwardenError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeskwardenError::Transport(format!("{} returned {}", path, status)));
        }

        let body = read_body(response)?;
        parse_json(&body, path)
    }
}

fn build_http_client(timeout: Duration) -> Result<Client, DeskwardenError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DeskwardenError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

fn read_body(response: Response) -> Result<Vec<u8>, DeskwardenError> {
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| DeskwardenError::Transport(format!("Failed to read body: {}", e)))
}

fn parse_json<T: DeserializeOwned>(body: &[u8], path: &str) -> Result<T, DeskwardenError> {
    serde_json::from_slice(body)
        .map_err(|e| DeskwardenError::ProtocolError(format!("Invalid {} response: {}", path, e)))
}

/// Build a User-Agent string from config.
///
/// Format: `<product>/deskwarden-<version> <app>`
pub fn build_user_agent(config: &DeskwardenConfig) -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        "{}/deskwarden-{} {}",
        config.user_agent_product, version, config.app_name
    )
}
