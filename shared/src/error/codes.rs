//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 7xxx: Seating errors (guests, tables)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 1xxx: Auth ====================
    /// Admin session missing
    NotAuthenticated = 1001,
    /// Wrong admin password
    InvalidCredentials = 1002,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 7xxx: Seating ====================
    /// Table id does not resolve
    TableNotFound = 7001,
    /// Guest id does not resolve
    GuestNotFound = 7002,
    /// Assignment would exceed table capacity
    CapacityExceeded = 7003,
    /// Table still has guests assigned
    TableHasGuests = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage backend unreachable
    StorageUnavailable = 9004,
    /// Document export failed
    ExportFailed = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",

            // Auth
            ErrorCode::NotAuthenticated => "Admin session required",
            ErrorCode::InvalidCredentials => "Invalid password",
            ErrorCode::SessionExpired => "Session has expired",

            // Seating
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::GuestNotFound => "Guest not found",
            ErrorCode::CapacityExceeded => "Table capacity exceeded",
            ErrorCode::TableHasGuests => "Cannot delete table with assigned guests",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageUnavailable => "Storage is unavailable",
            ErrorCode::ExportFailed => "Failed to generate document",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1005 => Ok(ErrorCode::SessionExpired),

            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::GuestNotFound),
            7003 => Ok(ErrorCode::CapacityExceeded),
            7004 => Ok(ErrorCode::TableHasGuests),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::StorageUnavailable),
            9005 => Ok(ErrorCode::ExportFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::TableNotFound,
            ErrorCode::CapacityExceeded,
            ErrorCode::StorageUnavailable,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        // retired general codes no longer decode
        for retired in [1, 3, 4, 5, 9003] {
            assert!(ErrorCode::try_from(retired).is_err());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::CapacityExceeded.to_string(), "E7003");
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "E0002");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableHasGuests).unwrap();
        assert_eq!(json, "7004");
    }
}
