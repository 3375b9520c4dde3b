//! Shared types for the seating service
//!
//! Models, API payloads, and the unified error type used by the server and
//! any client talking to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
