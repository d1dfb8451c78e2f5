//! # petitorium-core
//!
//! Core crate for the Petitorium plugin system. Contains the contract types
//! shared by the host and by plugins (hook types, request/response data),
//! the configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Petitorium crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::{DispatchPolicy, HookType, RequestData, ResponseData};
