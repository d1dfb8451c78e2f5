//! Hook registry: plugins register hooks per hook type in insertion order.
//!
//! Each hook type maps to an immutable, reference-counted chain of entries.
//! Registration and removal build a new chain and swap it in under a short
//! write lock; lookups clone the current chain under a read lock, so a
//! dispatch keeps iterating a consistent snapshot even while plugins are
//! admitted or evicted concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use petitorium_core::config::PluginSettings;
use petitorium_core::types::HookType;

use crate::error::PluginError;
use crate::traits::PluginHook;

/// Entry in the hook registry.
#[derive(Clone)]
pub struct HookEntry {
    /// Plugin that registered this hook.
    plugin_name: Arc<str>,
    /// The hook.
    hook: PluginHook,
    /// Settings installed into the context while this hook runs.
    settings: Arc<PluginSettings>,
}

impl HookEntry {
    /// Returns the name of the owning plugin.
    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    /// Returns the hook.
    pub fn hook(&self) -> &PluginHook {
        &self.hook
    }

    /// Returns the owning plugin's settings.
    pub fn settings(&self) -> &Arc<PluginSettings> {
        &self.settings
    }
}

impl std::fmt::Debug for HookEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookEntry")
            .field("plugin_name", &self.plugin_name)
            .field("settings", &self.settings.len())
            .finish()
    }
}

/// Snapshot of the hooks registered for one hook type, in registration
/// order.
///
/// Cheap to clone and unaffected by later registry changes; iterate it as
/// many times as needed.
#[derive(Debug, Clone, Default)]
pub struct HookChain {
    entries: Arc<[HookEntry]>,
}

impl HookChain {
    /// Iterates the entries in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, HookEntry> {
        self.entries.iter()
    }

    /// Returns the number of hooks in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the owning plugin names in registration order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.iter().map(HookEntry::plugin_name).collect()
    }
}

impl<'a> IntoIterator for &'a HookChain {
    type Item = &'a HookEntry;
    type IntoIter = std::slice::Iter<'a, HookEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Registry of hooks organized by hook type.
#[derive(Debug, Default)]
pub struct HookRegistry {
    /// Hook type → chain in registration order.
    chains: RwLock<HashMap<HookType, HookChain>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hook for a plugin with no plugin settings.
    pub fn register(
        &self,
        hook_type: HookType,
        plugin_name: &str,
        hook: PluginHook,
    ) -> Result<(), PluginError> {
        self.register_with_settings(hook_type, plugin_name, hook, Arc::default())
    }

    /// Appends a hook for a plugin, carrying the settings the dispatcher
    /// installs into the context while the hook runs.
    ///
    /// Fails with [`PluginError::DuplicateRegistration`] if the plugin
    /// already has a hook for this hook type.
    pub fn register_with_settings(
        &self,
        hook_type: HookType,
        plugin_name: &str,
        hook: PluginHook,
        settings: Arc<PluginSettings>,
    ) -> Result<(), PluginError> {
        let mut chains = self.chains.write();
        let current = chains.get(&hook_type).cloned().unwrap_or_default();

        if current.iter().any(|e| e.plugin_name() == plugin_name) {
            return Err(PluginError::DuplicateRegistration {
                plugin: plugin_name.to_string(),
                hook: hook_type,
            });
        }

        let mut entries: Vec<HookEntry> = current.iter().cloned().collect();
        entries.push(HookEntry {
            plugin_name: Arc::from(plugin_name),
            hook,
            settings,
        });
        let position = entries.len();
        chains.insert(
            hook_type,
            HookChain {
                entries: entries.into(),
            },
        );

        debug!(
            hook = %hook_type,
            plugin = %plugin_name,
            position = position,
            "Hook registered"
        );

        Ok(())
    }

    /// Removes every hook of a plugin across all hook types.
    ///
    /// Idempotent; returns how many hooks were removed.
    pub fn unregister(&self, plugin_name: &str) -> usize {
        let mut chains = self.chains.write();
        let mut removed = 0;

        for chain in chains.values_mut() {
            if !chain.iter().any(|e| e.plugin_name() == plugin_name) {
                continue;
            }
            let kept: Vec<HookEntry> = chain
                .iter()
                .filter(|e| e.plugin_name() != plugin_name)
                .cloned()
                .collect();
            removed += chain.len() - kept.len();
            *chain = HookChain {
                entries: kept.into(),
            };
        }

        chains.retain(|_, chain| !chain.is_empty());

        if removed > 0 {
            info!(plugin = %plugin_name, removed = removed, "Hooks unregistered for plugin");
        }

        removed
    }

    /// Removes one plugin's hook for a single hook type.
    ///
    /// Returns whether a hook was removed.
    pub fn unregister_hook(&self, hook_type: HookType, plugin_name: &str) -> bool {
        let mut chains = self.chains.write();
        let Some(chain) = chains.get(&hook_type) else {
            return false;
        };

        let kept: Vec<HookEntry> = chain
            .iter()
            .filter(|e| e.plugin_name() != plugin_name)
            .cloned()
            .collect();
        if kept.len() == chain.len() {
            return false;
        }

        if kept.is_empty() {
            chains.remove(&hook_type);
        } else {
            chains.insert(
                hook_type,
                HookChain {
                    entries: kept.into(),
                },
            );
        }

        debug!(hook = %hook_type, plugin = %plugin_name, "Hook unregistered");
        true
    }

    /// Returns the hooks registered for a hook type, in registration order.
    pub fn lookup(&self, hook_type: HookType) -> HookChain {
        self.chains
            .read()
            .get(&hook_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns whether any hook is registered for a hook type.
    pub fn has_hooks(&self, hook_type: HookType) -> bool {
        self.chains.read().contains_key(&hook_type)
    }

    /// Returns the number of hooks registered for a hook type.
    pub fn hook_count(&self, hook_type: HookType) -> usize {
        self.chains
            .read()
            .get(&hook_type)
            .map(HookChain::len)
            .unwrap_or(0)
    }

    /// Returns all hook types with at least one hook, sorted.
    pub fn registered_hooks(&self) -> Vec<HookType> {
        let mut hooks: Vec<HookType> = self.chains.read().keys().copied().collect();
        hooks.sort();
        hooks
    }

    /// Returns the hook types a plugin is registered for, sorted.
    pub fn hooks_of(&self, plugin_name: &str) -> Vec<HookType> {
        let mut hooks: Vec<HookType> = self
            .chains
            .read()
            .iter()
            .filter(|(_, chain)| chain.iter().any(|e| e.plugin_name() == plugin_name))
            .map(|(hook, _)| *hook)
            .collect();
        hooks.sort();
        hooks
    }
}
