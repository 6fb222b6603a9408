//! License usability policy.
//!
//! A license is usable iff:
//! - it verified (authentic claims)
//! - it is not expired
//! - the action-specific user-count check passes
//!
//! Authenticity lives in `license::verify`; this module only evaluates
//! already verified claims against the clock and the user store's count.

use crate::clock::Clock;
use crate::protocol::models::{LicenseData, VerificationOutcome};
use crate::DeskwardenError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Instant a license with the given expiration date stops being current.
///
/// The date is read as UTC midnight at the start of that day.
pub fn expiration_instant(expiration_date: NaiveDate) -> DateTime<Utc> {
    expiration_date.and_time(NaiveTime::MIN).and_utc()
}

/// True iff `now` is strictly after the expiration instant.
pub fn is_expired_at(expiration_date: NaiveDate, now: DateTime<Utc>) -> bool {
    now > expiration_instant(expiration_date)
}

/// True iff the clock's current time is strictly after the expiration instant.
pub fn is_license_expired(expiration_date: NaiveDate, clock: &dyn Clock) -> bool {
    is_expired_at(expiration_date, clock.now_utc())
}

/// Summary of an installation's license for display and gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LicenseStatus {
    /// Verified and current.
    #[serde(rename_all = "camelCase")]
    Active {
        /// Whole days until expiry.
        days_remaining: i64,
        /// Licensed seats.
        max_users: u32,
    },
    /// Verified but past its expiration date.
    #[serde(rename_all = "camelCase")]
    Expired {
        /// Expiration date of the license.
        expired_on: NaiveDate,
    },
    /// Failed verification.
    Invalid {
        /// Verification failure message.
        reason: String,
    },
    /// Nothing activated.
    NotActivated,
}

impl LicenseStatus {
    /// Whether the installation may operate normally.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Derive the status of a possibly absent verification outcome.
pub fn evaluate_status(outcome: Option<&VerificationOutcome>, clock: &dyn Clock) -> LicenseStatus {
    let Some(outcome) = outcome else {
        return LicenseStatus::NotActivated;
    };

    let Some(data) = outcome.license() else {
        return LicenseStatus::Invalid {
            reason: outcome
                .error
                .clone()
                .unwrap_or_else(|| "license did not verify".to_string()),
        };
    };

    status_of(data, clock)
}

/// Status of verified license data.
pub fn status_of(data: &LicenseData, clock: &dyn Clock) -> LicenseStatus {
    let now = clock.now_utc();
    if is_expired_at(data.expiration_date, now) {
        LicenseStatus::Expired {
            expired_on: data.expiration_date,
        }
    } else {
        LicenseStatus::Active {
            days_remaining: (expiration_instant(data.expiration_date) - now).num_days(),
            max_users: data.max_users,
        }
    }
}

/// Seat limits from a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCaps {
    /// Maximum active users.
    pub max_users: u32,
}

impl UserCaps {
    /// Extract caps from license data.
    pub fn from_license(data: &LicenseData) -> Self {
        Self {
            max_users: data.max_users,
        }
    }

    /// Whether one more user may be created.
    ///
    /// # Returns
    /// * `true` - `active_users + 1 <= max_users`
    /// * `false` - would exceed the licensed seats
    pub fn allows_new_user(&self, active_users: u32) -> bool {
        active_users < self.max_users
    }

    /// Whether the current user count is within the licensed seats.
    pub fn allows_users(&self, active_users: u32) -> bool {
        active_users <= self.max_users
    }
}

/// Operation being gated by the license.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicensedAction {
    /// Ordinary use of the application.
    General,
    /// Creating a new user account.
    CreateUser {
        /// Users currently active, from the user store.
        active_users: u32,
    },
}

/// Check that a verification outcome permits `action` now.
///
/// # Returns
/// * `Ok(caps)` - Access granted
/// * `Err(SignatureInvalid)` - License did not verify
/// * `Err(LicenseExpired)` - License is past its expiration date
/// * `Err(UserLimitExceeded)` - `CreateUser` would exceed `max_users`
pub fn check_usable(
    outcome: &VerificationOutcome,
    clock: &dyn Clock,
    action: LicensedAction,
) -> Result<UserCaps, DeskwardenError> {
    let data = outcome.license().ok_or(DeskwardenError::SignatureInvalid)?;
    check_license_data(data, clock, action)
}

/// Same as [`check_usable`] for claims already known to be authentic.
pub fn check_license_data(
    data: &LicenseData,
    clock: &dyn Clock,
    action: LicensedAction,
) -> Result<UserCaps, DeskwardenError> {
    if is_license_expired(data.expiration_date, clock) {
        return Err(DeskwardenError::LicenseExpired {
            expired_on: data.expiration_date,
        });
    }

    let caps = UserCaps::from_license(data);

    if let LicensedAction::CreateUser { active_users } = action {
        if !caps.allows_new_user(active_users) {
            return Err(DeskwardenError::UserLimitExceeded {
                max_users: caps.max_users,
                active_users,
            });
        }
    }

    Ok(caps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn license(max_users: u32) -> LicenseData {
        LicenseData {
            company_name: "Fabrikam".to_string(),
            contact_email: "desk@fabrikam.test".to_string(),
            expiration_date: date(2026, 12, 31),
            max_users,
            features: Default::default(),
        }
    }

    #[test]
    fn test_not_expired_before_boundary() {
        let clock = MockClock::from_rfc3339("2026-12-30T23:59:59Z");
        assert!(!is_license_expired(date(2026, 12, 31), &clock));
    }

    #[test]
    fn test_not_expired_at_exact_boundary() {
        let clock = MockClock::from_rfc3339("2026-12-31T00:00:00Z");
        assert!(!is_license_expired(date(2026, 12, 31), &clock));
    }

    #[test]
    fn test_expired_just_after_boundary() {
        let mut clock = MockClock::from_rfc3339("2026-12-31T00:00:00Z");
        clock.advance(chrono::Duration::milliseconds(1));
        assert!(is_license_expired(date(2026, 12, 31), &clock));
    }

    #[test]
    fn test_expired_long_after() {
        let clock = MockClock::from_rfc3339("2030-01-01T00:00:00Z");
        assert!(is_license_expired(date(2026, 12, 31), &clock));
    }

    #[test]
    fn test_status_not_activated() {
        let clock = MockClock::from_rfc3339("2026-06-01T00:00:00Z");
        assert_eq!(evaluate_status(None, &clock), LicenseStatus::NotActivated);
    }

    #[test]
    fn test_status_invalid_carries_reason() {
        let clock = MockClock::from_rfc3339("2026-06-01T00:00:00Z");
        let outcome = VerificationOutcome::rejected("bad signature");
        assert_eq!(
            evaluate_status(Some(&outcome), &clock),
            LicenseStatus::Invalid {
                reason: "bad signature".to_string()
            }
        );
    }

    #[test]
    fn test_status_active_days_remaining() {
        let clock = MockClock::from_rfc3339("2026-12-21T00:00:00Z");
        let outcome = VerificationOutcome::verified(license(5));
        let status = evaluate_status(Some(&outcome), &clock);
        assert_eq!(
            status,
            LicenseStatus::Active {
                days_remaining: 10,
                max_users: 5
            }
        );
        assert!(status.is_usable());
    }

    #[test]
    fn test_status_expired() {
        let clock = MockClock::from_rfc3339("2027-01-02T00:00:00Z");
        let outcome = VerificationOutcome::verified(license(5));
        let status = evaluate_status(Some(&outcome), &clock);
        assert_eq!(
            status,
            LicenseStatus::Expired {
                expired_on: date(2026, 12, 31)
            }
        );
        assert!(!status.is_usable());
    }

    #[test]
    fn test_status_serializes_tagged() {
        let json = serde_json::to_value(LicenseStatus::Expired {
            expired_on: date(2026, 12, 31),
        })
        .unwrap();
        assert_eq!(json["status"], "expired");
        assert_eq!(json["expiredOn"], "2026-12-31");
    }

    #[test]
    fn test_user_caps() {
        let caps = UserCaps::from_license(&license(3));
        assert!(caps.allows_new_user(2)); // 2 + 1 = 3, at limit
        assert!(!caps.allows_new_user(3));
        assert!(caps.allows_users(3));
        assert!(!caps.allows_users(4));
    }

    #[test]
    fn test_check_usable_general() {
        let clock = MockClock::from_rfc3339("2026-06-01T00:00:00Z");
        let outcome = VerificationOutcome::verified(license(3));
        let caps = check_usable(&outcome, &clock, LicensedAction::General).unwrap();
        assert_eq!(caps.max_users, 3);
    }

    #[test]
    fn test_check_usable_unverified() {
        let clock = MockClock::from_rfc3339("2026-06-01T00:00:00Z");
        let outcome = VerificationOutcome::rejected("nope");
        let result = check_usable(&outcome, &clock, LicensedAction::General);
        assert!(matches!(result, Err(DeskwardenError::SignatureInvalid)));
    }

    #[test]
    fn test_check_usable_expired() {
        let clock = MockClock::from_rfc3339("2027-06-01T00:00:00Z");
        let outcome = VerificationOutcome::verified(license(3));
        let result = check_usable(&outcome, &clock, LicensedAction::General);
        assert!(matches!(result, Err(DeskwardenError::LicenseExpired { .. })));
    }

    #[test]
    fn test_check_usable_user_limit() {
        let clock = MockClock::from_rfc3339("2026-06-01T00:00:00Z");
        let outcome = VerificationOutcome::verified(license(3));

        assert!(check_usable(&outcome, &clock, LicensedAction::CreateUser { active_users: 2 }).is_ok());

        let result = check_usable(&outcome, &clock, LicensedAction::CreateUser { active_users: 3 });
        assert!(matches!(
            result,
            Err(DeskwardenError::UserLimitExceeded {
                max_users: 3,
                active_users: 3
            })
        ));
    }

    #[test]
    fn test_expiry_checked_before_user_count() {
        let clock = MockClock::from_rfc3339("2027-06-01T00:00:00Z");
        let outcome = VerificationOutcome::verified(license(3));
        let result = check_usable(&outcome, &clock, LicensedAction::CreateUser { active_users: 99 });
        assert!(matches!(result, Err(DeskwardenError::LicenseExpired { .. })));
    }
}
