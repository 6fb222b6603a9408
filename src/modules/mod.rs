//! Module gating: which feature areas are on for this installation.
//!
//! Resolution is a pure function of the static catalog and a settings
//! snapshot. A missing or empty toggle falls back to the module default.

pub mod registry;

pub use registry::{ModuleCategory, ModuleDefinition, ModuleKey, MODULES};

use crate::settings::Settings;
use std::collections::BTreeSet;

/// Whether a module is enabled under the given settings.
pub fn is_module_enabled(key: ModuleKey, settings: &Settings) -> bool {
    let definition = key.definition();
    settings.get_bool(definition.setting_key, definition.default_enabled)
}

/// Every enabled module.
pub fn enabled_modules(settings: &Settings) -> BTreeSet<ModuleKey> {
    MODULES
        .iter()
        .map(|m| m.key)
        .filter(|key| is_module_enabled(*key, settings))
        .collect()
}

/// Catalog entries in one category, in display order.
pub fn modules_in_category(category: ModuleCategory) -> impl Iterator<Item = &'static ModuleDefinition> {
    MODULES.iter().filter(move |m| m.category == category)
}

/// Settings entry that records an admin toggle.
pub fn module_toggle(key: ModuleKey, enabled: bool) -> (&'static str, &'static str) {
    (key.definition().setting_key, if enabled { "true" } else { "false" })
}
