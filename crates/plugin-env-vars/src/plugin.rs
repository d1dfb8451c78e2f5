//! Env-vars plugin implementation: the [`Plugin`] the host admits.

use std::collections::HashMap;
use std::sync::Arc;

use petitorium_core::types::HookType;
use petitorium_plugin::{Plugin, PluginHook};

use crate::hooks::{SubstituteHook, ValidateHook};

/// Name under which the plugin is admitted and configured.
pub const PLUGIN_NAME: &str = "env-vars";

/// Built-in environment variable plugin.
#[derive(Debug, Default)]
pub struct EnvVarsPlugin;

impl EnvVarsPlugin {
    /// Create a new env-vars plugin
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for EnvVarsPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        "Substitutes {{name}} placeholders from the active environment"
    }

    fn hooks(&self) -> Vec<HookType> {
        vec![HookType::PreRequest, HookType::RequestValidation]
    }

    fn hook_funcs(&self) -> HashMap<HookType, PluginHook> {
        HashMap::from([
            (HookType::PreRequest, Arc::new(SubstituteHook) as PluginHook),
            (HookType::RequestValidation, Arc::new(ValidateHook) as PluginHook),
        ])
    }
}
