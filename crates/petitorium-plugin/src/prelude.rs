//! Prelude for convenient imports.

pub use async_trait::async_trait;

pub use petitorium_core::config::PluginSettings;
pub use petitorium_core::error::{AppError, ErrorKind};
pub use petitorium_core::result::AppResult;
pub use petitorium_core::types::{DispatchPolicy, HookType, RequestData, ResponseData};

pub use crate::error::PluginError;
pub use crate::hooks::context::{HookContext, ResponsePayload};
pub use crate::traits::{HookHandler, Plugin, PluginHook, hook_fn};
