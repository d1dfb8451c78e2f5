//! Environment variable plugin for Petitorium.
//!
//! Replaces `{{name}}` placeholders in outgoing requests with values from
//! the active environment, falling back to the plugin's configured
//! `defaults`, and rejects requests that still carry placeholders.

pub mod hooks;
pub mod plugin;
pub mod template;

pub use plugin::EnvVarsPlugin;
