//! Assembles a [`Plugin`] from closures or handler values.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use petitorium_core::result::AppResult;
use petitorium_core::types::HookType;
use petitorium_plugin::traits::{Plugin, PluginHook, hook_fn};
use petitorium_plugin::HookContext;

/// Builder for a plugin whose hooks are closures or handler values.
///
/// Hook types are declared in the order they are added; adding the same
/// hook type again replaces its function but keeps its position.
#[derive(Debug)]
pub struct PluginBuilder {
    plugin: BuiltPlugin,
}

impl PluginBuilder {
    /// Starts a plugin with a name and semantic version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            plugin: BuiltPlugin {
                name: name.into(),
                version: version.into(),
                description: String::new(),
                hooks: Vec::new(),
            },
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.plugin.description = description.into();
        self
    }

    /// Adds a closure hook.
    pub fn hook<F>(self, hook: HookType, func: F) -> Self
    where
        F: for<'a> Fn(&'a mut HookContext) -> BoxFuture<'a, AppResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.handler(hook, hook_fn(func))
    }

    /// Adds an existing handler.
    pub fn handler(mut self, hook: HookType, handler: PluginHook) -> Self {
        match self.plugin.hooks.iter_mut().find(|(h, _)| *h == hook) {
            Some(slot) => slot.1 = handler,
            None => self.plugin.hooks.push((hook, handler)),
        }
        self
    }

    /// Finishes the plugin, ready for admission.
    pub fn build(self) -> Arc<dyn Plugin> {
        Arc::new(self.plugin)
    }
}

/// Plugin produced by [`PluginBuilder`].
pub struct BuiltPlugin {
    name: String,
    version: String,
    description: String,
    hooks: Vec<(HookType, PluginHook)>,
}

impl std::fmt::Debug for BuiltPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltPlugin")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("hooks", &self.hooks())
            .finish()
    }
}

impl Plugin for BuiltPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn hooks(&self) -> Vec<HookType> {
        self.hooks.iter().map(|(hook, _)| *hook).collect()
    }

    fn hook_funcs(&self) -> HashMap<HookType, PluginHook> {
        self.hooks
            .iter()
            .map(|(hook, func)| (*hook, func.clone()))
            .collect()
    }
}
