//! Role and permission models.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Named capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Open new tickets.
    #[serde(rename = "canCreateTickets")]
    CreateTickets,
    /// Edit tickets.
    #[serde(rename = "canUpdateTickets")]
    UpdateTickets,
    /// Resolve and close tickets.
    #[serde(rename = "canCloseTickets")]
    CloseTickets,
    /// Approve change requests.
    #[serde(rename = "canApproveChanges")]
    ApproveChanges,
    /// Author and publish knowledge base articles.
    #[serde(rename = "canManageKB")]
    ManageKb,
    /// Edit configuration items.
    #[serde(rename = "canManageCMDB")]
    ManageCmdb,
    /// Administer user accounts.
    #[serde(rename = "canManageUsers")]
    ManageUsers,
    /// Administer roles.
    #[serde(rename = "canManageRoles")]
    ManageRoles,
    /// View reports.
    #[serde(rename = "canViewReports")]
    ViewReports,
    /// Restricted to the user's own tenant.
    #[serde(rename = "isTenantScoped")]
    TenantScoped,
}

impl Permission {
    /// Every permission.
    pub const ALL: [Permission; 10] = [
        Permission::CreateTickets,
        Permission::UpdateTickets,
        Permission::CloseTickets,
        Permission::ApproveChanges,
        Permission::ManageKb,
        Permission::ManageCmdb,
        Permission::ManageUsers,
        Permission::ManageRoles,
        Permission::ViewReports,
        Permission::TenantScoped,
    ];

    /// Field name in the permission payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTickets => "canCreateTickets",
            Self::UpdateTickets => "canUpdateTickets",
            Self::CloseTickets => "canCloseTickets",
            Self::ApproveChanges => "canApproveChanges",
            Self::ManageKb => "canManageKB",
            Self::ManageCmdb => "canManageCMDB",
            Self::ManageUsers => "canManageUsers",
            Self::ManageRoles => "canManageRoles",
            Self::ViewReports => "canViewReports",
            Self::TenantScoped => "isTenantScoped",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission {:?}", s))
    }
}

/// Permission record attached to a role.
///
/// Missing fields, `null` and anything other than a JSON boolean read as
/// `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPermissions {
    /// See [`Permission::CreateTickets`].
    #[serde(rename = "canCreateTickets", deserialize_with = "lenient_flag")]
    pub can_create_tickets: bool,
    /// See [`Permission::UpdateTickets`].
    #[serde(rename = "canUpdateTickets", deserialize_with = "lenient_flag")]
    pub can_update_tickets: bool,
    /// See [`Permission::CloseTickets`].
    #[serde(rename = "canCloseTickets", deserialize_with = "lenient_flag")]
    pub can_close_tickets: bool,
    /// See [`Permission::ApproveChanges`].
    #[serde(rename = "canApproveChanges", deserialize_with = "lenient_flag")]
    pub can_approve_changes: bool,
    /// See [`Permission::ManageKb`].
    #[serde(rename = "canManageKB", deserialize_with = "lenient_flag")]
    pub can_manage_kb: bool,
    /// See [`Permission::ManageCmdb`].
    #[serde(rename = "canManageCMDB", deserialize_with = "lenient_flag")]
    pub can_manage_cmdb: bool,
    /// See [`Permission::ManageUsers`].
    #[serde(rename = "canManageUsers", deserialize_with = "lenient_flag")]
    pub can_manage_users: bool,
    /// See [`Permission::ManageRoles`].
    #[serde(rename = "canManageRoles", deserialize_with = "lenient_flag")]
    pub can_manage_roles: bool,
    /// See [`Permission::ViewReports`].
    #[serde(rename = "canViewReports", deserialize_with = "lenient_flag")]
    pub can_view_reports: bool,
    /// See [`Permission::TenantScoped`].
    #[serde(rename = "isTenantScoped", deserialize_with = "lenient_flag")]
    pub is_tenant_scoped: bool,
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

impl UserPermissions {
    /// Record with every flag set.
    pub fn all() -> Self {
        Self::from_granted(&Permission::ALL)
    }

    /// Record with exactly the listed flags set.
    pub fn from_granted(granted: &[Permission]) -> Self {
        let mut record = Self::default();
        for permission in granted {
            record.set(*permission, true);
        }
        record
    }

    /// Read one flag.
    pub fn get(&self, permission: Permission) -> bool {
        match permission {
            Permission::CreateTickets => self.can_create_tickets,
            Permission::UpdateTickets => self.can_update_tickets,
            Permission::CloseTickets => self.can_close_tickets,
            Permission::ApproveChanges => self.can_approve_changes,
            Permission::ManageKb => self.can_manage_kb,
            Permission::ManageCmdb => self.can_manage_cmdb,
            Permission::ManageUsers => self.can_manage_users,
            Permission::ManageRoles => self.can_manage_roles,
            Permission::ViewReports => self.can_view_reports,
            Permission::TenantScoped => self.is_tenant_scoped,
        }
    }

    /// Write one flag.
    pub fn set(&mut self, permission: Permission, value: bool) {
        let slot = match permission {
            Permission::CreateTickets => &mut self.can_create_tickets,
            Permission::UpdateTickets => &mut self.can_update_tickets,
            Permission::CloseTickets => &mut self.can_close_tickets,
            Permission::ApproveChanges => &mut self.can_approve_changes,
            Permission::ManageKb => &mut self.can_manage_kb,
            Permission::ManageCmdb => &mut self.can_manage_cmdb,
            Permission::ManageUsers => &mut self.can_manage_users,
            Permission::ManageRoles => &mut self.can_manage_roles,
            Permission::ViewReports => &mut self.can_view_reports,
            Permission::TenantScoped => &mut self.is_tenant_scoped,
        };
        *slot = value;
    }

    /// Flags that are set.
    pub fn granted(&self) -> Vec<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(|p| self.get(*p))
            .collect()
    }
}

/// Named permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name (e.g., "Agent").
    pub name: String,
    /// Granted capabilities.
    pub permissions: UserPermissions,
}

/// Authenticated user as seen by the gating layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: String,
    /// Resolved role, `None` when the lookup failed or none is assigned.
    #[serde(default)]
    pub role: Option<Role>,
}

impl User {
    /// Permission record, if a role is resolvable.
    pub fn permissions(&self) -> Option<&UserPermissions> {
        self.role.as_ref().map(|r| &r.permissions)
    }
}
