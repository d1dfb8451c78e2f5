//! Hook points in the request lifecycle and dispatch failure policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Enumeration of all lifecycle points where plugins can intercept and
/// modify the request/response flow.
///
/// The serialized form (and [`HookType::as_str`]) is the stable wire name
/// used in configuration files and plugin manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookType {
    // ── Request lifecycle ──
    /// Before the request is sent, with template variables still in place.
    PreRequest,
    /// After environment variables have been substituted.
    PostVariableSubstitution,
    /// Just before sending the request.
    PreSend,
    /// After the request has been sent.
    PostSend,
    /// After the response has been received.
    PostReceive,
    /// After the complete request/response cycle.
    PostRequest,

    // ── Validation ──
    /// Validate the request before sending.
    RequestValidation,
    /// Validate the response after receiving.
    ResponseValidation,

    // ── Data management ──
    /// Before saving data (collections, environments, etc.).
    PreSave,
    /// After saving data.
    PostSave,

    // ── UI lifecycle ──
    /// Before the UI is updated.
    PreUiUpdate,
    /// After the UI is updated.
    PostUiUpdate,
    /// When the UI is initialized.
    OnUiInit,
    /// When the UI is closed.
    OnUiClose,

    // ── Collections ──
    /// When a collection is loaded.
    OnCollectionLoad,
    /// When a collection is saved.
    OnCollectionSave,

    // ── Environments ──
    /// When an environment is loaded.
    OnEnvironmentLoad,
    /// When an environment is saved.
    OnEnvironmentSave,

    // ── Configuration ──
    /// When configuration is loaded.
    OnConfigLoad,
    /// When configuration is saved.
    OnConfigSave,

    // ── Outcome ──
    /// When an error occurs.
    OnError,
    /// When an operation succeeds.
    OnSuccess,

    // ── Advanced request ──
    /// When a request is retried.
    RequestRetry,
    /// When a request times out.
    RequestTimeout,

    // ── Response processing ──
    /// Transform response data.
    ResponseTransform,
    /// Cache response data.
    ResponseCache,
}

impl HookType {
    /// Every hook type, in lifecycle order.
    pub const ALL: [HookType; 26] = [
        Self::PreRequest,
        Self::PostVariableSubstitution,
        Self::PreSend,
        Self::PostSend,
        Self::PostReceive,
        Self::PostRequest,
        Self::RequestValidation,
        Self::ResponseValidation,
        Self::PreSave,
        Self::PostSave,
        Self::PreUiUpdate,
        Self::PostUiUpdate,
        Self::OnUiInit,
        Self::OnUiClose,
        Self::OnCollectionLoad,
        Self::OnCollectionSave,
        Self::OnEnvironmentLoad,
        Self::OnEnvironmentSave,
        Self::OnConfigLoad,
        Self::OnConfigSave,
        Self::OnError,
        Self::OnSuccess,
        Self::RequestRetry,
        Self::RequestTimeout,
        Self::ResponseTransform,
        Self::ResponseCache,
    ];

    /// Returns the wire name of this hook type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreRequest => "pre_request",
            Self::PostVariableSubstitution => "post_variable_substitution",
            Self::PreSend => "pre_send",
            Self::PostSend => "post_send",
            Self::PostReceive => "post_receive",
            Self::PostRequest => "post_request",
            Self::RequestValidation => "request_validation",
            Self::ResponseValidation => "response_validation",
            Self::PreSave => "pre_save",
            Self::PostSave => "post_save",
            Self::PreUiUpdate => "pre_ui_update",
            Self::PostUiUpdate => "post_ui_update",
            Self::OnUiInit => "on_ui_init",
            Self::OnUiClose => "on_ui_close",
            Self::OnCollectionLoad => "on_collection_load",
            Self::OnCollectionSave => "on_collection_save",
            Self::OnEnvironmentLoad => "on_environment_load",
            Self::OnEnvironmentSave => "on_environment_save",
            Self::OnConfigLoad => "on_config_load",
            Self::OnConfigSave => "on_config_save",
            Self::OnError => "on_error",
            Self::OnSuccess => "on_success",
            Self::RequestRetry => "request_retry",
            Self::RequestTimeout => "request_timeout",
            Self::ResponseTransform => "response_transform",
            Self::ResponseCache => "response_cache",
        }
    }

    /// Returns whether this hook only reports an outcome.
    pub fn is_notification(&self) -> bool {
        matches!(self, Self::OnError | Self::OnSuccess | Self::PostRequest)
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|hook| hook.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown hook type '{s}'")))
    }
}

/// How a dispatch reacts to a failing hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Abort the remaining hooks on the first failure.
    #[default]
    FailFast,
    /// Run every hook and report all failures together.
    BestEffort,
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail_fast"),
            Self::BestEffort => f.write_str("best_effort"),
        }
    }
}
