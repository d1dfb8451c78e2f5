//! Hook system: invocation context, registry, and dispatcher.

pub mod context;
pub mod dispatcher;
pub mod registry;

pub use context::{HookContext, ResponsePayload};
pub use dispatcher::{DispatchReport, HookDispatcher, HookSettings};
pub use registry::{HookChain, HookEntry, HookRegistry};
