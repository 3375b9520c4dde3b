//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Field-level rules live on the payload structs (`validator` derive);
//! this module turns their errors into [`AppError`]s.

use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Search queries
pub const MAX_QUERY_LEN: usize = 200;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Run the derived validation rules of a payload.
///
/// The first failing field's message becomes the error message; every
/// failing field is listed in the details.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} is invalid"));
            (field.to_string(), message)
        })
        .collect();
    fields.sort();

    let message = fields
        .first()
        .map(|(_, m)| m.clone())
        .unwrap_or_else(|| "Validation failed".to_string());

    fields
        .into_iter()
        .fold(AppError::validation(message), |err, (field, msg)| {
            err.with_detail(field, msg)
        })
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Trim an optional contact field, mapping blank input to `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// True when an optional field was sent as an empty string
pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| v.trim().is_empty())
}
