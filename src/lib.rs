//! # Deskwarden
//!
//! **Offline license keys and feature gating for a self-hosted service desk.**
//!
//! Deskwarden covers the two pieces of an ITSM installation that decide
//! what is switched on:
//!
//! - **Licensing**: the vendor signs license claims (company, contact,
//!   expiry, seat count, feature tags) with an Ed25519 private key; the
//!   deployed application verifies them against an embedded public key.
//!   No network call is involved.
//! - **Gating**: a static catalog of feature modules resolved against the
//!   flat settings store, and fail-closed permission checks over the
//!   signed-in user's role.
//!
//! ## Quickstart
//!
//! ```no_run
//! use deskwarden::{DeskwardenConfig, LicenseManager, LicensedAction};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), deskwarden::DeskwardenError> {
//!     let config = DeskwardenConfig {
//!         app_name: "servicedesk/2.4.0",
//!         public_key_pem: "-----BEGIN PUBLIC KEY-----\n...\n-----END PUBLIC KEY-----\n",
//!         store_namespace: "servicedesk",
//!         user_agent_product: "servicedesk",
//!         api_base_url: "https://desk.example.com",
//!         request_timeout: Duration::from_secs(10),
//!     };
//!
//!     let manager = LicenseManager::new(config)?;
//!     manager.activate("eyJk-YXRh-...")?;
//!     manager.ensure_usable(LicensedAction::CreateUser { active_users: 12 })?;
//!     Ok(())
//! }
//! ```
//!
//! ## License key format
//!
//! ```text
//! claims    = {"company":..,"email":..,"expires":"YYYY-MM-DD","users":N,"features":[..]}
//! envelope  = {"data": base64(claims), "signature": base64(ed25519(claims))}
//! key       = base64(envelope), split into 4-character groups joined by '-'
//! ```
//!
//! Verification ([`verify_license_key`]) checks authenticity only; expiry
//! and seat limits are separate policy in [`policy::license`].
//!
//! ## Threat Model
//!
//! Claims cannot be altered without the vendor's private key, and the
//! persisted activation is re-verified on every read. Client-side module
//! and permission gating is advisory: protected endpoints must also check
//! permissions server-side ([`permissions::authorize`]). Deskwarden does
//! **not** prevent binary patching.

#![warn(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;
pub mod settings;

// Crypto layer
pub mod crypto;

// Protocol layer
pub mod protocol;

// Licensing
pub mod license;
pub mod policy;
pub mod store;

// Manager (activation API)
pub mod manager;

// Gating
pub mod modules;
pub mod permissions;

// Client layer
pub mod client;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::DeskwardenConfig;
pub use errors::DeskwardenError;
pub use license::issue::generate_license_key;
pub use license::verify::{verify_license_key, LicenseVerifier};
pub use manager::LicenseManager;
pub use modules::{enabled_modules, is_module_enabled, ModuleKey};
pub use permissions::{Permission, PermissionGuard, UserPermissions};
pub use policy::license::{is_license_expired, LicenseStatus, LicensedAction};
pub use protocol::models::{LicenseData, VerificationOutcome};
pub use settings::Settings;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
