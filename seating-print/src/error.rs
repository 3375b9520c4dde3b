//! Error types for the document writer

use thiserror::Error;

/// Document writer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Margins and footer leave no room for content
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Font size must be positive and finite
    #[error("Invalid font size: {0}")]
    InvalidFontSize(f32),
}

/// Result type for document operations
pub type PrintResult<T> = Result<T, PrintError>;
