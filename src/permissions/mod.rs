//! Permission resolution for the authenticated user.
//!
//! Every predicate is fail-closed: with no permission record (not signed
//! in, or role lookup failed) every check answers `false`.
//!
//! Client-side guards are advisory. Protected endpoints must call
//! [`PermissionGuard::require`] (or [`authorize`]) server-side as well.

pub mod model;

pub use model::{Permission, Role, User, UserPermissions};

use crate::DeskwardenError;
use tracing::debug;

/// Navigation side effect used by [`PermissionGuard::require_permission`].
pub trait Navigator {
    /// Navigate to `target`.
    fn navigate(&mut self, target: &str);
}

impl<F: FnMut(&str)> Navigator for F {
    fn navigate(&mut self, target: &str) {
        self(target)
    }
}

/// Authorization view over an optional permission record.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGuard<'a> {
    permissions: Option<&'a UserPermissions>,
}

impl<'a> PermissionGuard<'a> {
    /// Guard over a possibly absent record.
    pub fn new(permissions: Option<&'a UserPermissions>) -> Self {
        Self { permissions }
    }

    /// Guard for a possibly absent user.
    pub fn for_user(user: Option<&'a User>) -> Self {
        Self::new(user.and_then(User::permissions))
    }

    /// Whether a record is present.
    pub fn is_resolved(&self) -> bool {
        self.permissions.is_some()
    }

    /// True iff a record exists and grants `permission`.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.is_some_and(|p| p.get(permission))
    }

    /// True iff a record exists and grants at least one of `permissions`.
    ///
    /// An empty list is never satisfied.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }

    /// True iff a record exists and grants every one of `permissions`.
    ///
    /// An empty list is vacuously satisfied, but only when a record exists.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        self.is_resolved() && permissions.iter().all(|p| self.has_permission(*p))
    }

    /// UI-boundary guard: navigate to `redirect_target` when denied.
    ///
    /// Returns whether the permission is held.
    pub fn require_permission(
        &self,
        permission: Permission,
        redirect_target: &str,
        navigator: &mut dyn Navigator,
    ) -> bool {
        if self.has_permission(permission) {
            return true;
        }
        debug!(%permission, redirect = redirect_target, "permission missing, redirecting");
        navigator.navigate(redirect_target);
        false
    }

    /// Server-side check for a protected endpoint.
    pub fn require(&self, permission: Permission) -> Result<(), DeskwardenError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(DeskwardenError::PermissionDenied {
                permission: permission.to_string(),
            })
        }
    }
}

/// True iff `permissions` exists and grants `permission`.
pub fn has_permission(permissions: Option<&UserPermissions>, permission: Permission) -> bool {
    PermissionGuard::new(permissions).has_permission(permission)
}

/// True iff `permissions` exists and grants at least one of `required`.
pub fn has_any_permission(permissions: Option<&UserPermissions>, required: &[Permission]) -> bool {
    PermissionGuard::new(permissions).has_any_permission(required)
}

/// True iff `permissions` exists and grants every one of `required`.
pub fn has_all_permissions(permissions: Option<&UserPermissions>, required: &[Permission]) -> bool {
    PermissionGuard::new(permissions).has_all_permissions(required)
}

/// Server-side check: `Ok` iff `permissions` exists and grants `permission`.
pub fn authorize(
    permissions: Option<&UserPermissions>,
    permission: Permission,
) -> Result<(), DeskwardenError> {
    PermissionGuard::new(permissions).require(permission)
}
