//! Type-safe error codes for API responses.
//!
//! Single source of truth for error codes used across the application.
//! Each error code carries a string representation for clients
//! (e.g., "VALIDATION_ERROR"), an integer code for logging and
//! monitoring (e.g., 1001), and a default human-readable message.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Requested resource was not found
    NotFound,

    /// JSON extraction from request body failed
    JsonExtraction,

    // Server errors (2000-2999)
    /// An unexpected internal server error occurred
    InternalError,

    /// JSON serialization or deserialization failed server-side
    SerdeJsonError,

    /// I/O operation failed
    IoError,

    /// Database migration failed
    MigrationError,

    /// A downstream service is unavailable
    ServiceUnavailable,
}

impl ErrorCode {
    /// String identifier for client consumption.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::JsonExtraction => "JSON_EXTRACTION_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::SerdeJsonError => "SERDE_JSON_ERROR",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::MigrationError => "MIGRATION_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code for logging and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::NotFound => 1004,
            ErrorCode::JsonExtraction => 1005,
            ErrorCode::InternalError => 2000,
            ErrorCode::SerdeJsonError => 2001,
            ErrorCode::IoError => 2002,
            ErrorCode::MigrationError => 2003,
            ErrorCode::ServiceUnavailable => 2004,
        }
    }

    /// Default human-readable message.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Request validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::JsonExtraction => "Invalid JSON in request body",
            ErrorCode::InternalError => "An internal server error occurred",
            ErrorCode::SerdeJsonError => "JSON processing failed",
            ErrorCode::IoError => "I/O operation failed",
            ErrorCode::MigrationError => "Database migration failed",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_ranges() {
        assert!(ErrorCode::ValidationError.code() < 2000);
        assert!(ErrorCode::NotFound.code() < 2000);
        assert!(ErrorCode::InternalError.code() >= 2000);
        assert!(ErrorCode::ServiceUnavailable.code() >= 2000);
    }

    #[test]
    fn test_string_identifiers() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
    }
}
