//! Hook dispatch configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DispatchPolicy, HookType};

/// Dispatch settings applied to every hook invocation.
#[derive(Debug, Clone, PartialEq, Validate, Serialize, Deserialize)]
pub struct HookConfig {
    /// Per-hook time limit in milliseconds. `0` disables the limit.
    #[serde(default = "default_timeout_ms")]
    #[validate(range(max = 600_000))]
    pub timeout_ms: u64,
    /// Dispatch notification hooks (`on_error`, `on_success`,
    /// `post_request`) best-effort unless `policies` says otherwise.
    #[serde(default)]
    pub notifications_best_effort: bool,
    /// Explicit policy per hook type. Unlisted hooks use fail-fast.
    #[serde(default)]
    pub policies: HashMap<HookType, DispatchPolicy>,
}

impl HookConfig {
    /// Resolves the policy for a hook type.
    pub fn policy_for(&self, hook: HookType) -> DispatchPolicy {
        if let Some(policy) = self.policies.get(&hook) {
            return *policy;
        }
        if self.notifications_best_effort && hook.is_notification() {
            DispatchPolicy::BestEffort
        } else {
            DispatchPolicy::FailFast
        }
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            notifications_best_effort: false,
            policies: HashMap::new(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}
