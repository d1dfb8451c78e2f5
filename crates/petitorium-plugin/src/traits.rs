//! The plugin contract: the [`Plugin`] trait and the hook signature.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use futures::future::BoxFuture;
use regex::Regex;

use petitorium_core::result::AppResult;
use petitorium_core::types::HookType;

use crate::error::PluginError;
use crate::hooks::context::HookContext;

/// A hook: the only function shape a plugin may register.
///
/// Hooks may modify `ctx` in place; later hooks of the same dispatch see
/// the modifications. Returning an error fails the hook.
#[async_trait]
pub trait HookHandler: Send + Sync + std::fmt::Debug {
    /// Handles a hook invocation.
    async fn handle(&self, ctx: &mut HookContext) -> AppResult<()>;
}

/// Shared handle to a registered hook.
pub type PluginHook = Arc<dyn HookHandler>;

/// Trait that all plugins must implement.
///
/// This is the sole boundary between the host and a plugin. `hooks()` and
/// the keys of `hook_funcs()` must name the same set of hook types; the
/// host rejects the plugin at admission otherwise.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Unique name of the plugin.
    fn name(&self) -> &str;

    /// Semantic version of the plugin, e.g. `"1.0.0"`.
    fn version(&self) -> &str;

    /// Brief description of what the plugin does.
    fn description(&self) -> &str;

    /// Hook types this plugin participates in.
    fn hooks(&self) -> Vec<HookType>;

    /// One hook per declared hook type.
    fn hook_funcs(&self) -> HashMap<HookType, PluginHook>;
}

/// Signature of a closure usable as a hook.
type HookClosure =
    dyn for<'a> Fn(&'a mut HookContext) -> BoxFuture<'a, AppResult<()>> + Send + Sync;

/// A closure-based hook handler for quick handler creation.
pub struct ClosureHandler {
    /// Handler function.
    handler: Box<HookClosure>,
}

impl std::fmt::Debug for ClosureHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureHandler")
            .field("handler", &"<closure>")
            .finish()
    }
}

#[async_trait]
impl HookHandler for ClosureHandler {
    async fn handle(&self, ctx: &mut HookContext) -> AppResult<()> {
        (self.handler)(ctx).await
    }
}

/// Wraps a closure into a [`PluginHook`].
///
/// ```rust,ignore
/// let hook = hook_fn(|ctx| {
///     Box::pin(async move {
///         if let Some(request) = ctx.request_mut() {
///             request.set_header("X-Test", "1");
///         }
///         Ok(())
///     })
/// });
/// ```
pub fn hook_fn<F>(handler: F) -> PluginHook
where
    F: for<'a> Fn(&'a mut HookContext) -> BoxFuture<'a, AppResult<()>> + Send + Sync + 'static,
{
    Arc::new(ClosureHandler {
        handler: Box::new(handler),
    })
}

static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    )
    .expect("semver pattern is valid")
});

/// Checks a plugin against the contract and returns its hooks in
/// declaration order.
///
/// Rejects empty or whitespace-containing names, non-semantic versions, and
/// any difference between `hooks()` and the keys of `hook_funcs()`.
pub fn validate_plugin(plugin: &dyn Plugin) -> Result<Vec<(HookType, PluginHook)>, PluginError> {
    let name = plugin.name();
    let invalid = |reason: String| PluginError::InvalidPlugin {
        plugin: name.to_string(),
        reason,
    };

    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(invalid(
            "name must be non-empty and contain no whitespace".to_string(),
        ));
    }
    if !SEMVER.is_match(plugin.version()) {
        return Err(invalid(format!(
            "version '{}' is not a semantic version",
            plugin.version()
        )));
    }

    let mut declared = Vec::new();
    let mut seen = HashSet::new();
    for hook in plugin.hooks() {
        if seen.insert(hook) {
            declared.push(hook);
        }
    }

    let mut funcs = plugin.hook_funcs();
    let mut missing: Vec<HookType> = declared
        .iter()
        .copied()
        .filter(|hook| !funcs.contains_key(hook))
        .collect();
    let mut undeclared: Vec<HookType> = funcs
        .keys()
        .copied()
        .filter(|hook| !seen.contains(hook))
        .collect();

    if !missing.is_empty() || !undeclared.is_empty() {
        missing.sort();
        undeclared.sort();
        return Err(invalid(format!(
            "declared hooks without functions: [{}]; functions for undeclared hooks: [{}]",
            join(&missing),
            join(&undeclared)
        )));
    }

    Ok(declared
        .into_iter()
        .filter_map(|hook| funcs.remove(&hook).map(|func| (hook, func)))
        .collect())
}

fn join(hooks: &[HookType]) -> String {
    hooks
        .iter()
        .map(HookType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
