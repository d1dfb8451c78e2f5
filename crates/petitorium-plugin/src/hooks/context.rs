//! Per-dispatch context handed to every hook.

use std::collections::HashMap;
use std::sync::Arc;

use petitorium_core::config::PluginSettings;
use petitorium_core::types::{RequestData, ResponseData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Response value visible to hooks.
///
/// Lifecycle points after a response arrives carry the typed HTTP response;
/// other points (retry bookkeeping, cached entries, UI state) may carry a
/// plugin-defined JSON value instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ResponsePayload {
    /// A received HTTP response.
    Http(ResponseData),
    /// Any other plugin-defined value.
    Value(Value),
}

/// Data a hook can read and modify during one dispatch.
///
/// The host builds one context per in-flight request (or per lifecycle
/// event) and passes it by `&mut` to the dispatcher, so hooks of a single
/// dispatch always run one after another against the same state.
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Identifier used to correlate log lines of one dispatch.
    pub id: Uuid,
    /// The request, absent for lifecycle points with no request.
    pub request: Option<RequestData>,
    /// The response, absent until one exists.
    pub response: Option<ResponsePayload>,
    /// Environment variables available for substitution.
    pub environment: HashMap<String, String>,
    /// Settings of the plugin whose hook is currently running.
    ///
    /// Installed by the dispatcher before each hook and cleared afterwards.
    pub config: Arc<PluginSettings>,
    /// Cancelled when the originating request is cancelled.
    pub cancellation: CancellationToken,
}

impl HookContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            request: None,
            response: None,
            environment: HashMap::new(),
            config: Arc::default(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Creates a context carrying a request.
    pub fn for_request(request: RequestData) -> Self {
        Self {
            request: Some(request),
            ..Self::new()
        }
    }

    /// Sets the HTTP response.
    pub fn with_response(mut self, response: ResponseData) -> Self {
        self.response = Some(ResponsePayload::Http(response));
        self
    }

    /// Sets a plugin-defined response value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.response = Some(ResponsePayload::Value(value));
        self
    }

    /// Sets the environment variables.
    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    /// Links this context to the originating request's cancellation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns a mutable reference to the request, if any.
    pub fn request_mut(&mut self) -> Option<&mut RequestData> {
        self.request.as_mut()
    }

    /// Returns the HTTP response, if the response is one.
    pub fn http_response(&self) -> Option<&ResponseData> {
        match &self.response {
            Some(ResponsePayload::Http(response)) => Some(response),
            _ => None,
        }
    }

    /// Gets a setting of the running plugin.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Gets a string setting.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.setting(key).and_then(Value::as_str)
    }

    /// Gets a boolean setting.
    pub fn setting_bool(&self, key: &str) -> Option<bool> {
        self.setting(key).and_then(Value::as_bool)
    }

    /// Returns whether the originating request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new()
    }
}
