//! Plugin host: admission and eviction of plugins, and the entry point for
//! firing hooks.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use petitorium_core::config::{HookConfig, PluginConfig};
use petitorium_core::types::{DispatchPolicy, HookType};

use crate::error::PluginError;
use crate::hooks::context::HookContext;
use crate::hooks::dispatcher::{DispatchReport, HookDispatcher, HookSettings};
use crate::hooks::registry::HookRegistry;
use crate::registry::{PluginInfo, PluginRegistry};
use crate::traits::{Plugin, validate_plugin};

/// Outcome of [`PluginHost::admit_enabled`].
#[derive(Debug, Default)]
pub struct AdmissionReport {
    /// Plugins admitted, in candidate order.
    pub admitted: Vec<String>,
    /// Candidates not named in the enabled list.
    pub skipped: Vec<String>,
    /// Candidates that failed admission, with the reason.
    pub rejected: Vec<(String, PluginError)>,
}

impl AdmissionReport {
    /// Returns whether every enabled candidate was admitted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Owns the hook registry, dispatcher, and plugin registry for one host
/// instance.
///
/// Shared by `Arc`; every method takes `&self` and is safe to call from
/// concurrent tasks.
#[derive(Debug)]
pub struct PluginHost {
    /// Plugin registry.
    plugin_registry: Arc<PluginRegistry>,
    /// Hook registry.
    hook_registry: Arc<HookRegistry>,
    /// Hook dispatcher.
    hook_dispatcher: Arc<HookDispatcher>,
    /// Plugin configuration: enabled list, install records, settings.
    config: PluginConfig,
    /// Held for the whole of an admission or eviction.
    lifecycle: Mutex<()>,
}

impl PluginHost {
    /// Creates a host with default configuration.
    pub fn new() -> Self {
        Self::with_config(PluginConfig::default(), &HookConfig::default())
    }

    /// Creates a host from plugin and hook configuration.
    pub fn with_config(plugins: PluginConfig, hooks: &HookConfig) -> Self {
        Self::with_settings(plugins, HookSettings::from_config(hooks))
    }

    /// Creates a host with explicit dispatch settings.
    pub fn with_settings(plugins: PluginConfig, settings: HookSettings) -> Self {
        let hook_registry = Arc::new(HookRegistry::new());
        let hook_dispatcher = Arc::new(HookDispatcher::new(hook_registry.clone(), settings));

        Self {
            plugin_registry: Arc::new(PluginRegistry::new()),
            hook_registry,
            hook_dispatcher,
            config: plugins,
            lifecycle: Mutex::new(()),
        }
    }

    /// Admits a plugin: validates it, then registers each of its hooks
    /// under its name with its configured settings.
    ///
    /// Either every hook is registered or none is; a failure part-way
    /// removes the hooks this call registered and nothing else. Admissions
    /// and evictions never interleave.
    pub fn admit_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<PluginInfo, PluginError> {
        let hooks = validate_plugin(plugin.as_ref())?;
        let name = plugin.name().to_string();

        let mut info = PluginInfo::from_plugin(
            plugin.as_ref(),
            hooks.iter().map(|(hook, _)| *hook).collect(),
        );
        info.installed = self.config.installed.get(&name).cloned();

        if let Some(installed) = &info.installed {
            if installed.version != info.version {
                warn!(
                    plugin = %name,
                    installed = %installed.version,
                    version = %info.version,
                    "Plugin version differs from install record"
                );
            }
        }

        let _lifecycle = self.lifecycle.lock();
        self.plugin_registry.insert(plugin, info.clone())?;

        let settings = Arc::new(self.config.settings_for(&name));
        let mut registered = Vec::with_capacity(hooks.len());
        for (hook, func) in hooks {
            let outcome = self
                .hook_registry
                .register_with_settings(hook, &name, func, settings.clone());
            if let Err(e) = outcome {
                error!(plugin = %name, hook = %hook, error = %e, "Hook registration failed, rolling back");
                for done in registered {
                    self.hook_registry.unregister_hook(done, &name);
                }
                self.plugin_registry.remove(&name);
                return Err(e);
            }
            registered.push(hook);
        }

        info!(
            plugin = %name,
            version = %info.version,
            hooks = info.hooks.len(),
            "Plugin admitted"
        );

        Ok(info)
    }

    /// Admits the candidates named in the enabled list and skips the rest.
    ///
    /// A rejected candidate does not stop the others.
    pub fn admit_enabled<I>(&self, candidates: I) -> AdmissionReport
    where
        I: IntoIterator<Item = Arc<dyn Plugin>>,
    {
        let mut report = AdmissionReport::default();

        for plugin in candidates {
            let name = plugin.name().to_string();

            if !self.config.is_enabled(&name) {
                info!(plugin = %name, "Plugin not enabled, skipping");
                report.skipped.push(name);
                continue;
            }

            match self.admit_plugin(plugin) {
                Ok(_) => report.admitted.push(name),
                Err(e) => {
                    error!(plugin = %name, error = %e, "Plugin admission failed");
                    report.rejected.push((name, e));
                }
            }
        }

        report
    }

    /// Evicts a plugin: removes all of its hooks and its metadata.
    ///
    /// Returns `false` if no plugin of that name was admitted.
    pub fn evict_plugin(&self, name: &str) -> bool {
        let _lifecycle = self.lifecycle.lock();
        let removed_hooks = self.hook_registry.unregister(name);
        let removed = self.plugin_registry.remove(name).is_some();

        if removed {
            info!(plugin = %name, hooks = removed_hooks, "Plugin evicted");
        }

        removed
    }

    /// Evicts every admitted plugin and returns how many were evicted.
    pub fn evict_all(&self) -> usize {
        let evicted = self
            .plugin_registry
            .names()
            .iter()
            .filter(|name| self.evict_plugin(name))
            .count();

        info!(evicted = evicted, "All plugins evicted");
        evicted
    }

    /// Dispatches a hook type with its configured policy.
    pub async fn dispatch(
        &self,
        hook: HookType,
        ctx: &mut HookContext,
    ) -> Result<DispatchReport, PluginError> {
        self.hook_dispatcher.dispatch(hook, ctx).await
    }

    /// Dispatches a hook type with an explicit policy.
    pub async fn dispatch_with_policy(
        &self,
        hook: HookType,
        ctx: &mut HookContext,
        policy: DispatchPolicy,
    ) -> Result<DispatchReport, PluginError> {
        self.hook_dispatcher
            .dispatch_with_policy(hook, ctx, policy)
            .await
    }

    /// Fires a notification hook best-effort, logging failures.
    pub async fn notify(&self, hook: HookType, ctx: &mut HookContext) {
        self.hook_dispatcher.notify(hook, ctx).await;
    }

    /// Returns the hook dispatcher for firing hooks.
    pub fn dispatcher(&self) -> &Arc<HookDispatcher> {
        &self.hook_dispatcher
    }

    /// Returns the hook registry.
    pub fn hook_registry(&self) -> &Arc<HookRegistry> {
        &self.hook_registry
    }

    /// Returns the plugin registry.
    pub fn plugin_registry(&self) -> &Arc<PluginRegistry> {
        &self.plugin_registry
    }

    /// Returns the plugin configuration.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Lists all admitted plugins, sorted by name.
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugin_registry.list()
    }
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}
