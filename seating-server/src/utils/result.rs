//! Unified Result Types
//!
//! Provides type aliases for commonly used Result types across the application

use crate::AppError;
use crate::db::StoreError;

/// Application-level Result type
///
/// Used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;

/// Storage-level Result type
///
/// Used by the [`SeatingStore`](crate::db::SeatingStore) backends
pub type StoreResult<T> = Result<T, StoreError>;
