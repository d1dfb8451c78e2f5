//! Plugin registry: stores admitted plugin instances and metadata.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use petitorium_core::config::InstalledInfo;
use petitorium_core::types::HookType;

use crate::error::PluginError;
use crate::traits::Plugin;

/// Metadata about an admitted plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    pub description: String,
    /// Hook types this plugin registered for, in declaration order.
    pub hooks: Vec<HookType>,
    /// Installation record from configuration, if any.
    pub installed: Option<InstalledInfo>,
    /// When the plugin was admitted.
    pub admitted_at: DateTime<Utc>,
}

impl PluginInfo {
    /// Builds metadata for a plugin about to be admitted.
    pub fn from_plugin(plugin: &dyn Plugin, hooks: Vec<HookType>) -> Self {
        Self {
            name: plugin.name().to_string(),
            version: plugin.version().to_string(),
            description: plugin.description().to_string(),
            hooks,
            installed: None,
            admitted_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
struct Admitted {
    plugin: Arc<dyn Plugin>,
    info: PluginInfo,
}

/// Registry of all admitted plugins, keyed by name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Plugin name → instance and metadata.
    plugins: RwLock<HashMap<String, Admitted>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an admitted plugin.
    ///
    /// Fails with [`PluginError::AlreadyAdmitted`] if the name is taken.
    pub fn insert(&self, plugin: Arc<dyn Plugin>, info: PluginInfo) -> Result<(), PluginError> {
        let mut plugins = self.plugins.write();

        if plugins.contains_key(&info.name) {
            return Err(PluginError::AlreadyAdmitted { plugin: info.name });
        }

        info!(plugin = %info.name, version = %info.version, "Registering plugin");
        plugins.insert(info.name.clone(), Admitted { plugin, info });

        Ok(())
    }

    /// Removes a plugin by name, returning its metadata if it was present.
    pub fn remove(&self, name: &str) -> Option<PluginInfo> {
        self.plugins.write().remove(name).map(|admitted| admitted.info)
    }

    /// Gets a plugin instance by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins
            .read()
            .get(name)
            .map(|admitted| admitted.plugin.clone())
    }

    /// Gets a plugin's metadata by name.
    pub fn info(&self, name: &str) -> Option<PluginInfo> {
        self.plugins
            .read()
            .get(name)
            .map(|admitted| admitted.info.clone())
    }

    /// Lists all plugin metadata sorted by name.
    pub fn list(&self) -> Vec<PluginInfo> {
        let mut infos: Vec<PluginInfo> = self
            .plugins
            .read()
            .values()
            .map(|admitted| admitted.info.clone())
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Returns all admitted plugin names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns plugin count.
    pub fn count(&self) -> usize {
        self.plugins.read().len()
    }

    /// Checks whether a plugin is admitted.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.read().contains_key(name)
    }
}
