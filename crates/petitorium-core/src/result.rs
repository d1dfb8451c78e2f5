//! Convenience result type alias for Petitorium.

use crate::error::AppError;

/// A specialized `Result` type for Petitorium operations.
///
/// Hooks return `AppResult<()>`, so plugin code can use `?` on anything
/// that converts into [`AppError`].
pub type AppResult<T> = Result<T, AppError>;
