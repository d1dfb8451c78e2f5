//! Plugin system configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form configuration for one plugin, keyed by setting name.
pub type PluginSettings = HashMap<String, Value>;

/// Plugin section of the host configuration file.
///
/// The host only consumes `enabled` and `config`; `registry_url` and
/// `installed` belong to the external installer and are surfaced as
/// metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Base URL of the plugin registry used by the installer.
    #[serde(default)]
    pub registry_url: String,
    /// Names of plugins that may be admitted.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Installation records, keyed by plugin name.
    #[serde(default)]
    pub installed: HashMap<String, InstalledInfo>,
    /// Plugin-specific settings, keyed by plugin name.
    #[serde(default)]
    pub config: HashMap<String, PluginSettings>,
}

impl PluginConfig {
    /// Returns whether the named plugin is in the enabled list.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|enabled| enabled == name)
    }

    /// Returns the settings for the named plugin, empty when none are set.
    pub fn settings_for(&self, name: &str) -> PluginSettings {
        self.config.get(name).cloned().unwrap_or_default()
    }
}

/// Installation record for one plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledInfo {
    /// Installed version.
    pub version: String,
    /// Checksum of the installed artifact.
    #[serde(default)]
    pub checksum: String,
    /// Filesystem path of the installed artifact.
    #[serde(default)]
    pub path: String,
}
