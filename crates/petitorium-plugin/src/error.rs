//! Error type for plugin admission and hook dispatch.
//!
//! Admission errors (`InvalidPlugin`, `DuplicateRegistration`,
//! `AlreadyAdmitted`) reject a single plugin. Dispatch errors carry the
//! failing plugin and hook type so the request pipeline can report them.

use std::time::Duration;

use petitorium_core::error::{AppError, ErrorKind};
use petitorium_core::types::HookType;
use thiserror::Error;

/// Errors raised by the hook registry, dispatcher, and plugin host.
#[derive(Debug, Error)]
pub enum PluginError {
    // --- Admission errors ---
    /// The plugin already has a hook registered for this hook type.
    #[error("Plugin '{plugin}' already has a hook registered for '{hook}'")]
    DuplicateRegistration {
        /// Name of the plugin.
        plugin: String,
        /// The hook type registered twice.
        hook: HookType,
    },

    /// The plugin violates the plugin contract.
    #[error("Invalid plugin '{plugin}': {reason}")]
    InvalidPlugin {
        /// Name of the plugin (possibly empty, if that is the problem).
        plugin: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A plugin with the same name is already admitted.
    #[error("Plugin '{plugin}' is already admitted")]
    AlreadyAdmitted {
        /// Name of the plugin.
        plugin: String,
    },

    // --- Dispatch errors ---
    /// A hook returned an error.
    #[error("Plugin '{plugin}' failed on hook '{hook}': {source}")]
    HookFailure {
        /// Plugin that owns the failing hook.
        plugin: String,
        /// Hook type being dispatched.
        hook: HookType,
        /// Error returned by the hook.
        #[source]
        source: AppError,
    },

    /// A hook did not finish within its time limit.
    #[error("Plugin '{plugin}' timed out on hook '{hook}' after {}ms", .timeout.as_millis())]
    HookTimeout {
        /// Plugin that owns the slow hook.
        plugin: String,
        /// Hook type being dispatched.
        hook: HookType,
        /// The limit that was exceeded.
        timeout: Duration,
    },

    /// The originating request was cancelled during dispatch.
    #[error("Dispatch of '{hook}' cancelled before plugin '{plugin}' completed")]
    Cancelled {
        /// Plugin whose hook was running or about to run.
        plugin: String,
        /// Hook type being dispatched.
        hook: HookType,
    },

    /// One or more hooks failed during a best-effort dispatch.
    #[error("{} hook(s) failed on '{hook}': {}", .failures.len(), summarize(.failures))]
    AggregateFailure {
        /// Hook type being dispatched.
        hook: HookType,
        /// Individual failures in invocation order.
        failures: Vec<PluginError>,
    },
}

impl PluginError {
    /// Returns the plugin this error is attributed to, if it has exactly one.
    pub fn plugin(&self) -> Option<&str> {
        match self {
            Self::DuplicateRegistration { plugin, .. }
            | Self::InvalidPlugin { plugin, .. }
            | Self::AlreadyAdmitted { plugin }
            | Self::HookFailure { plugin, .. }
            | Self::HookTimeout { plugin, .. }
            | Self::Cancelled { plugin, .. } => Some(plugin.as_str()),
            Self::AggregateFailure { .. } => None,
        }
    }

    /// Returns the individual failures: the inner list for an aggregate,
    /// otherwise this error alone.
    pub fn failures(&self) -> Vec<&PluginError> {
        match self {
            Self::AggregateFailure { failures, .. } => failures.iter().collect(),
            other => vec![other],
        }
    }
}

fn summarize(failures: &[PluginError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<PluginError> for AppError {
    fn from(err: PluginError) -> Self {
        let message = err.to_string();
        match err {
            PluginError::HookTimeout { .. } => AppError::timeout(message),
            PluginError::Cancelled { .. } => AppError::cancelled(message),
            PluginError::DuplicateRegistration { .. } | PluginError::AlreadyAdmitted { .. } => {
                AppError::conflict(message)
            }
            PluginError::InvalidPlugin { .. } => AppError::validation(message),
            other => AppError::with_source(ErrorKind::Plugin, message, other),
        }
    }
}
