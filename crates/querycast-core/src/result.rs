//! Convenience result type alias for QueryCast.

use crate::error::AppError;

/// A specialized `Result` type for QueryCast operations.
pub type AppResult<T> = Result<T, AppError>;
