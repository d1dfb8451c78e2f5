//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use petitorium_core::config::AppConfig;
use petitorium_core::error::AppError;
use petitorium_core::types::{HookType, RequestData};
use petitorium_plugin::{HookContext, Plugin, PluginHost};
use petitorium_plugin_sdk::PluginBuilder;

/// Ordered record of which hooks ran, shared between plugins of one test.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    /// Records a call.
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().expect("call log poisoned").push(entry.into());
    }

    /// Returns the calls so far.
    pub fn calls(&self) -> Vec<String> {
        self.0.lock().expect("call log poisoned").clone()
    }
}

/// Builds a plugin that records its name on `hook` and succeeds.
pub fn recording_plugin(name: &str, hook: HookType, log: &CallLog) -> Arc<dyn Plugin> {
    let log = log.clone();
    let tag = name.to_string();
    PluginBuilder::new(name, "1.0.0")
        .description("records each invocation")
        .hook(hook, move |_ctx| {
            let log = log.clone();
            let tag = tag.clone();
            Box::pin(async move {
                log.push(tag);
                Ok(())
            })
        })
        .build()
}

/// Builds a plugin that records its name on `hook` and fails with `message`.
pub fn failing_plugin(
    name: &str,
    hook: HookType,
    message: &'static str,
    log: &CallLog,
) -> Arc<dyn Plugin> {
    let log = log.clone();
    let tag = name.to_string();
    PluginBuilder::new(name, "1.0.0")
        .description("records each invocation, then fails")
        .hook(hook, move |_ctx| {
            let log = log.clone();
            let tag = tag.clone();
            Box::pin(async move {
                log.push(tag);
                Err(AppError::plugin(message))
            })
        })
        .build()
}

/// Loads configuration from TOML text written to a temporary file.
pub fn config_from_toml(toml: &str) -> AppConfig {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(toml.as_bytes())
        .expect("Failed to write temp config");

    let path = file.path().to_str().expect("temp path is UTF-8");
    AppConfig::load(path).expect("Failed to load test config")
}

/// Creates a host from configuration.
pub fn host_from(config: &AppConfig) -> PluginHost {
    PluginHost::with_config(config.plugins.clone(), &config.hooks)
}

/// A context carrying a bare GET request.
pub fn get_ctx(url: &str) -> HookContext {
    HookContext::for_request(RequestData::new("GET", url))
}
