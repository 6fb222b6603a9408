//! License Manager - the server-side activation and gating API.
//!
//! The `LicenseManager` backs the license activation endpoint and answers
//! "may the installation do this?" for the rest of the application:
//! - Activation: verify, reject expired, persist
//! - Status from the persisted, re-verified record
//! - Seat-count enforcement for user creation

use crate::clock::{Clock, SystemClock};
use crate::config::DeskwardenConfig;
use crate::license::verify::LicenseVerifier;
use crate::policy::license::{check_license_data, status_of, LicenseStatus, LicensedAction, UserCaps};
use crate::protocol::activation::{ActivationRequest, ActivationResponse};
use crate::protocol::models::LicenseData;
use crate::store::file::FileStore;
use crate::store::record::{hash_license_key, ActivationRecord};
use crate::store::LicenseStore;
use crate::DeskwardenError;
use std::sync::Arc;
use tracing::{info, warn};

/// Main license manager.
///
/// Create one instance per application and share it across request handlers.
pub struct LicenseManager {
    config: DeskwardenConfig,
    verifier: LicenseVerifier,
    clock: Arc<dyn Clock>,
    store: Arc<dyn LicenseStore>,
}

impl LicenseManager {
    /// Create a manager persisting to the platform data directory.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The store directory cannot be created
    pub fn new(config: DeskwardenConfig) -> Result<Self, DeskwardenError> {
        config.validate()?;
        let store = FileStore::new(config.store_namespace)?;
        Self::build(config, Arc::new(store), Arc::new(SystemClock))
    }

    /// Create a manager with a custom store.
    pub fn with_store(
        config: DeskwardenConfig,
        store: Arc<dyn LicenseStore>,
    ) -> Result<Self, DeskwardenError> {
        config.validate()?;
        Self::build(config, store, Arc::new(SystemClock))
    }

    /// Create a manager with a custom store and clock (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn new_with_clock(
        config: DeskwardenConfig,
        store: Arc<dyn LicenseStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DeskwardenError> {
        config.validate()?;
        Self::build(config, store, clock)
    }

    fn build(
        config: DeskwardenConfig,
        store: Arc<dyn LicenseStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DeskwardenError> {
        let verifier = LicenseVerifier::from_pem(config.public_key_pem)?;
        Ok(Self {
            config,
            verifier,
            clock,
            store,
        })
    }

    /// Activate a license key.
    ///
    /// Verification and the expiry check both happen before anything is
    /// persisted; a rejected key leaves any existing activation untouched.
    ///
    /// # Errors
    /// - `MalformedKey` / `DecodeError` / `PayloadError` - Key is not a license key
    /// - `SignatureInvalid` - Key was not issued by the vendor
    /// - `LicenseExpired` - Key is authentic but past its expiration date
    /// - `StoreIO` - Persisting the activation failed
    pub fn activate(&self, license_key: &str) -> Result<LicenseData, DeskwardenError> {
        let fingerprint = hash_license_key(license_key);
        let short = &fingerprint[..12];

        let data = self.verifier.try_verify(license_key).map_err(|e| {
            warn!(key = short, error = %e, "license activation rejected");
            e
        })?;

        check_license_data(&data, self.clock.as_ref(), LicensedAction::General).map_err(|e| {
            warn!(key = short, error = %e, "license activation rejected");
            e
        })?;

        let record = ActivationRecord::new(license_key, self.clock.as_ref());
        self.store.save(&record)?;

        info!(
            key = short,
            company = %data.company_name,
            expires = %data.expiration_date,
            max_users = data.max_users,
            "license activated"
        );
        Ok(data)
    }

    /// Handle a request to the license activation endpoint.
    pub fn handle_activation(&self, request: &ActivationRequest) -> ActivationResponse {
        match self.activate(&request.license_key) {
            Ok(data) => ActivationResponse::accepted(data),
            Err(e) => ActivationResponse::rejected(e),
        }
    }

    /// Currently activated license, re-verified from the store.
    ///
    /// # Errors
    /// - `StoreTampered` - Stored record no longer verifies
    /// - `StoreIO` - Store could not be read
    pub fn current(&self) -> Result<Option<LicenseData>, DeskwardenError> {
        let Some(record) = self.store.load()? else {
            return Ok(None);
        };
        record
            .verify(&self.verifier, self.clock.as_ref())
            .map(Some)
            .map_err(|e| {
                warn!(key = record.short_fingerprint(), error = %e, "stored license rejected");
                e
            })
    }

    /// Status of the installation's license. Never fails.
    pub fn status(&self) -> LicenseStatus {
        match self.current() {
            Ok(Some(data)) => status_of(&data, self.clock.as_ref()),
            Ok(None) => LicenseStatus::NotActivated,
            Err(e) => LicenseStatus::Invalid {
                reason: e.to_string(),
            },
        }
    }

    /// Check the installation may perform `action`.
    ///
    /// # Errors
    /// - `NotActivated` - No license stored
    /// - `LicenseExpired` - License past its expiration date
    /// - `UserLimitExceeded` - `CreateUser` would exceed the licensed seats
    /// - `StoreTampered` / `StoreIO` - Stored record unusable
    pub fn ensure_usable(&self, action: LicensedAction) -> Result<UserCaps, DeskwardenError> {
        let data = self.current()?.ok_or(DeskwardenError::NotActivated)?;
        check_license_data(&data, self.clock.as_ref(), action)
    }

    /// Remove the stored activation.
    pub fn deactivate(&self) -> Result<(), DeskwardenError> {
        self.store.clear()?;
        info!("license deactivated");
        Ok(())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &DeskwardenConfig {
        &self.config
    }
}
