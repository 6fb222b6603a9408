//! Static catalog of toggleable feature modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a feature module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKey {
    /// Incident tickets.
    Incidents,
    /// Knowledge base articles.
    KnowledgeBase,
    /// Reporting dashboards.
    Reports,
    /// Change requests and approvals.
    Changes,
    /// Problem management.
    Problems,
    /// Service catalog requests.
    ServiceCatalog,
    /// Configuration management database.
    Cmdb,
    /// Inbound e-mail to ticket conversion.
    EmailToTicket,
    /// Network discovery import into the CMDB.
    NetworkDiscovery,
}

impl ModuleKey {
    /// Every key, in catalog order.
    pub const ALL: [ModuleKey; 9] = [
        ModuleKey::Incidents,
        ModuleKey::KnowledgeBase,
        ModuleKey::Reports,
        ModuleKey::Changes,
        ModuleKey::Problems,
        ModuleKey::ServiceCatalog,
        ModuleKey::Cmdb,
        ModuleKey::EmailToTicket,
        ModuleKey::NetworkDiscovery,
    ];

    /// Snake-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::KnowledgeBase => "knowledge_base",
            Self::Reports => "reports",
            Self::Changes => "changes",
            Self::Problems => "problems",
            Self::ServiceCatalog => "service_catalog",
            Self::Cmdb => "cmdb",
            Self::EmailToTicket => "email_to_ticket",
            Self::NetworkDiscovery => "network_discovery",
        }
    }

    /// Catalog entry for this key.
    pub fn definition(&self) -> &'static ModuleDefinition {
        // Catalog order matches ALL.
        &MODULES[*self as usize]
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown module {:?}", s))
    }
}

/// Grouping used by the admin modules page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleCategory {
    /// Always-relevant service desk features.
    Core,
    /// ITIL process modules.
    Itil,
    /// Integrations and asset tooling.
    Advanced,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    /// Module identifier.
    pub key: ModuleKey,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Settings-store key holding the toggle.
    pub setting_key: &'static str,
    /// State when the toggle was never written.
    pub default_enabled: bool,
    /// Admin page grouping.
    pub category: ModuleCategory,
}

/// The catalog, in display order.
pub static MODULES: [ModuleDefinition; 9] = [
    ModuleDefinition {
        key: ModuleKey::Incidents,
        name: "Incidents",
        description: "Log, assign and resolve service desk tickets",
        setting_key: "module_incidents_enabled",
        default_enabled: true,
        category: ModuleCategory::Core,
    },
    ModuleDefinition {
        key: ModuleKey::KnowledgeBase,
        name: "Knowledge Base",
        description: "Publish articles and self-service answers",
        setting_key: "module_knowledge_base_enabled",
        default_enabled: true,
        category: ModuleCategory::Core,
    },
    ModuleDefinition {
        key: ModuleKey::Reports,
        name: "Reports",
        description: "Ticket volume, SLA and workload dashboards",
        setting_key: "module_reports_enabled",
        default_enabled: true,
        category: ModuleCategory::Core,
    },
    ModuleDefinition {
        key: ModuleKey::Changes,
        name: "Change Management",
        description: "Request, approve and schedule changes",
        setting_key: "module_changes_enabled",
        default_enabled: true,
        category: ModuleCategory::Itil,
    },
    ModuleDefinition {
        key: ModuleKey::Problems,
        name: "Problem Management",
        description: "Track root causes behind recurring incidents",
        setting_key: "module_problems_enabled",
        default_enabled: false,
        category: ModuleCategory::Itil,
    },
    ModuleDefinition {
        key: ModuleKey::ServiceCatalog,
        name: "Service Catalog",
        description: "Offer requestable services with approval workflows",
        setting_key: "module_service_catalog_enabled",
        default_enabled: false,
        category: ModuleCategory::Itil,
    },
    ModuleDefinition {
        key: ModuleKey::Cmdb,
        name: "CMDB",
        description: "Configuration items and their relationships",
        setting_key: "module_cmdb_enabled",
        default_enabled: true,
        category: ModuleCategory::Advanced,
    },
    ModuleDefinition {
        key: ModuleKey::EmailToTicket,
        name: "Email to Ticket",
        description: "Create and update tickets from a monitored mailbox",
        setting_key: "module_email_to_ticket_enabled",
        default_enabled: false,
        category: ModuleCategory::Advanced,
    },
    ModuleDefinition {
        key: ModuleKey::NetworkDiscovery,
        name: "Network Discovery",
        description: "Import scanned devices into the CMDB",
        setting_key: "module_network_discovery_enabled",
        default_enabled: false,
        category: ModuleCategory::Advanced,
    },
];
