//! Hook dispatcher: runs every hook registered for a hook type against one
//! context.
//!
//! - Hooks run sequentially in registration order; each sees the context
//!   modifications of the hooks before it.
//! - Before each hook the owning plugin's settings are installed as
//!   `ctx.config`; they are cleared when the dispatch ends.
//! - Under `FailFast` the first failure stops the dispatch. Under
//!   `BestEffort` every hook runs and failures come back as one
//!   `AggregateFailure`.
//! - Each hook is bounded by the configured timeout. Cancellation of the
//!   context's token aborts the dispatch under either policy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use petitorium_core::config::HookConfig;
use petitorium_core::types::{DispatchPolicy, HookType};

use super::context::HookContext;
use super::registry::{HookEntry, HookRegistry};
use crate::error::PluginError;

/// Dispatch settings resolved from [`HookConfig`].
#[derive(Debug, Clone, Default)]
pub struct HookSettings {
    /// Per-hook time limit; `None` means unbounded.
    pub timeout: Option<Duration>,
    /// Explicit policy per hook type.
    pub policies: HashMap<HookType, DispatchPolicy>,
}

impl HookSettings {
    /// Resolves settings from configuration.
    pub fn from_config(config: &HookConfig) -> Self {
        let timeout = (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms));
        let policies = HookType::ALL
            .into_iter()
            .map(|hook| (hook, config.policy_for(hook)))
            .filter(|(_, policy)| *policy != DispatchPolicy::FailFast)
            .collect();
        Self { timeout, policies }
    }

    /// Sets the per-hook time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the policy for one hook type.
    pub fn with_policy(mut self, hook: HookType, policy: DispatchPolicy) -> Self {
        self.policies.insert(hook, policy);
        self
    }

    /// Returns the policy for a hook type, `FailFast` unless configured.
    pub fn policy_for(&self, hook: HookType) -> DispatchPolicy {
        self.policies.get(&hook).copied().unwrap_or_default()
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// The hook type dispatched.
    pub hook: HookType,
    /// The policy applied.
    pub policy: DispatchPolicy,
    /// Plugins whose hooks ran, in invocation order.
    pub invoked: Vec<String>,
}

/// Dispatches hooks to all registered handlers.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook registry.
    registry: Arc<HookRegistry>,
    /// Timeout and policies.
    settings: HookSettings,
}

impl HookDispatcher {
    /// Creates a new hook dispatcher.
    pub fn new(registry: Arc<HookRegistry>, settings: HookSettings) -> Self {
        Self { registry, settings }
    }

    /// Dispatches a hook type using its configured policy.
    pub async fn dispatch(
        &self,
        hook: HookType,
        ctx: &mut HookContext,
    ) -> Result<DispatchReport, PluginError> {
        let policy = self.settings.policy_for(hook);
        self.dispatch_with_policy(hook, ctx, policy).await
    }

    /// Dispatches a hook type using an explicit policy.
    pub async fn dispatch_with_policy(
        &self,
        hook: HookType,
        ctx: &mut HookContext,
        policy: DispatchPolicy,
    ) -> Result<DispatchReport, PluginError> {
        let chain = self.registry.lookup(hook);
        let mut report = DispatchReport {
            hook,
            policy,
            invoked: Vec::with_capacity(chain.len()),
        };

        if chain.is_empty() {
            return Ok(report);
        }

        debug!(
            hook = %hook,
            policy = %policy,
            dispatch_id = %ctx.id,
            hook_count = chain.len(),
            "Dispatching hook"
        );

        let mut failures = Vec::new();
        let mut outcome = Ok(());

        for entry in &chain {
            report.invoked.push(entry.plugin_name().to_string());

            match self.invoke(hook, entry, ctx).await {
                Ok(()) => {
                    debug!(hook = %hook, plugin = %entry.plugin_name(), "Hook completed");
                }
                Err(err @ PluginError::Cancelled { .. }) => {
                    warn!(hook = %hook, dispatch_id = %ctx.id, error = %err, "Dispatch cancelled");
                    outcome = Err(err);
                    break;
                }
                Err(err) if policy == DispatchPolicy::FailFast => {
                    warn!(hook = %hook, dispatch_id = %ctx.id, error = %err, "Hook failed, aborting dispatch");
                    outcome = Err(err);
                    break;
                }
                Err(err) => {
                    warn!(hook = %hook, dispatch_id = %ctx.id, error = %err, "Hook failed, continuing");
                    failures.push(err);
                }
            }
        }

        ctx.config = Arc::default();
        outcome?;

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(PluginError::AggregateFailure { hook, failures })
        }
    }

    /// Dispatches a notification hook best-effort and logs any failures
    /// instead of returning them.
    pub async fn notify(&self, hook: HookType, ctx: &mut HookContext) {
        if let Err(err) = self
            .dispatch_with_policy(hook, ctx, DispatchPolicy::BestEffort)
            .await
        {
            warn!(hook = %hook, error = %err, "Notification hook reported failures");
        }
    }

    /// Runs one hook under the owning plugin's settings, the timeout, and
    /// the context's cancellation token.
    async fn invoke(
        &self,
        hook: HookType,
        entry: &HookEntry,
        ctx: &mut HookContext,
    ) -> Result<(), PluginError> {
        let plugin = entry.plugin_name();
        let cancelled = || PluginError::Cancelled {
            plugin: plugin.to_string(),
            hook,
        };

        if ctx.is_cancelled() {
            return Err(cancelled());
        }

        ctx.config = entry.settings().clone();
        let token = ctx.cancellation.clone();
        let call = entry.hook().handle(ctx);

        let result = match self.settings.timeout {
            Some(limit) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(cancelled()),
                timed = tokio::time::timeout(limit, call) => match timed {
                    Ok(result) => result,
                    Err(_) => {
                        return Err(PluginError::HookTimeout {
                            plugin: plugin.to_string(),
                            hook,
                            timeout: limit,
                        });
                    }
                },
            },
            None => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(cancelled()),
                result = call => result,
            },
        };

        result.map_err(|source| PluginError::HookFailure {
            plugin: plugin.to_string(),
            hook,
            source,
        })
    }

    /// Returns the dispatch settings.
    pub fn settings(&self) -> &HookSettings {
        &self.settings
    }

    /// Returns a reference to the hook registry.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }
}
