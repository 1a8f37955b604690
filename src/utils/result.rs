//! Result alias for handlers

use super::AppError;

/// Result type used by every API handler
pub type AppResult<T> = Result<T, AppError>;
