//! # petitorium-plugin
//!
//! Plugin framework for Petitorium. Provides:
//!
//! - The [`Plugin`] contract and the async [`HookHandler`] signature
//! - A hook registry with insertion-ordered, copy-on-write hook chains
//! - A hook dispatcher with per-hook-type fail-fast / best-effort policies,
//!   per-hook timeouts, and cancellation
//! - [`PluginHost`], the admission/eviction boundary used by plugin loaders

pub mod error;
pub mod hooks;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod traits;

pub use error::PluginError;
pub use hooks::context::{HookContext, ResponsePayload};
pub use hooks::dispatcher::{DispatchReport, HookDispatcher, HookSettings};
pub use hooks::registry::{HookChain, HookEntry, HookRegistry};
pub use manager::{AdmissionReport, PluginHost};
pub use registry::{PluginInfo, PluginRegistry};
pub use traits::{HookHandler, Plugin, PluginHook, hook_fn};
