//! # petitorium-plugin-sdk
//!
//! SDK for developing plugins for Petitorium.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use petitorium_plugin_sdk::prelude::*;
//!
//! let plugin = PluginBuilder::new("request-id", "1.0.0")
//!     .description("Stamps every request with an id header")
//!     .hook(HookType::PreSend, |ctx| {
//!         Box::pin(async move {
//!             let id = ctx.id.to_string();
//!             if let Some(request) = ctx.request_mut() {
//!                 request.set_header("X-Request-Id", &id);
//!             }
//!             Ok(())
//!         })
//!     })
//!     .build();
//!
//! host.admit_plugin(plugin)?;
//! ```

pub mod builder;

pub use builder::{BuiltPlugin, PluginBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use futures::future::BoxFuture;
    pub use petitorium_plugin::prelude::*;
    pub use serde_json::{Value, json};

    pub use crate::builder::{BuiltPlugin, PluginBuilder};
}
