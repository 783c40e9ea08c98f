// ABOUTME: Unified error handling for the Vitals health-metrics API
// ABOUTME: Defines ErrorCode, AppError, the HTTP error body, and domain error conversions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! # Unified Error Handling
//!
//! Domain code returns precise `thiserror` enums (`TokenError`,
//! `PaginationError`, `StoreError`). At the HTTP boundary everything collapses
//! into `AppError`, whose `ErrorCode` decides the status and the `code` field
//! of the JSON error body.

/// Cursor pagination engine errors
pub mod pagination;
/// Opaque token codec errors
pub mod token;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use pagination::{PaginationError, StoreError};
pub use token::TokenError;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1000-1999)
    /// No credentials were supplied
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credentials were supplied but rejected
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// Credentials have expired
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,
    /// Authorization header is not a bearer credential
    #[serde(rename = "AUTH_MALFORMED")]
    AuthMalformed = 1003,

    // Validation (3000-3999)
    /// Generic invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Input is not in the expected format
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// Numeric input outside the accepted range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,
    /// Pagination cursor could not be resolved
    #[serde(rename = "INVALID_CURSOR")]
    InvalidCursor = 3004,

    // Resources (4000-4999)
    /// Requested record or page does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Dependency is temporarily unavailable
    #[serde(rename = "RESOURCE_UNAVAILABLE")]
    ResourceUnavailable = 4003,
    /// Request did not finish before its deadline
    #[serde(rename = "REQUEST_TIMEOUT")]
    RequestTimeout = 4008,

    // Configuration (6000-6999)
    /// Generic configuration failure
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration value is absent
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// Configuration value failed to parse or validate
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Backing store failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Response body could not be produced
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidFormat | Self::ValueOutOfRange | Self::InvalidCursor => {
                400
            }
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired | Self::AuthMalformed => 401,
            Self::ResourceNotFound => 404,
            Self::RequestTimeout => 408,
            Self::ResourceUnavailable => 503,
            Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::ConfigError
            | Self::ConfigMissing
            | Self::ConfigInvalid => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::AuthMalformed => "The authorization header is malformed",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::InvalidCursor => "The pagination token is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceUnavailable => "The resource is temporarily unavailable",
            Self::RequestTimeout => "The request took too long to complete",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization failed",
        }
    }

    /// True for 5xx codes
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

/// Unified error type for the application
#[derive(Debug)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message, safe to show to API consumers
    pub message: String,
    /// Request ID for correlating logs with the response
    pub request_id: Option<String>,
    /// Source error for error chaining
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
            source: None,
        }
    }

    /// Attach the request ID of the failing request
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Missing credentials
    #[must_use]
    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    /// Rejected credentials
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid pagination cursor
    #[must_use]
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCursor, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration value is absent
    #[must_use]
    pub fn config_missing(key: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("Missing required configuration: {key}"),
        )
    }

    /// Configuration value is present but unusable
    #[must_use]
    pub fn config_invalid(key: &str, reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ConfigInvalid, format!("Invalid {key}: {reason}"))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an HTTP error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Request ID, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message.clone(),
                request_id: error.request_id.clone(),
            },
        }
    }
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> Self {
        let code = if error.is_decoding_error() {
            ErrorCode::InvalidInput
        } else {
            ErrorCode::InternalError
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<PaginationError> for AppError {
    fn from(error: PaginationError) -> Self {
        match error {
            PaginationError::InvalidCursor { reason, source } => {
                let app = Self::invalid_cursor(format!("invalid pagination token: {reason}"));
                match source {
                    Some(token_error) => app.with_source(token_error),
                    None => app,
                }
            }
            PaginationError::ConflictingCursors | PaginationError::InvalidPageSize { .. } => {
                Self::invalid_input(error.to_string())
            }
            PaginationError::NotFound => Self::new(ErrorCode::ResourceNotFound, error.to_string()),
            PaginationError::Encoding(token_error) => {
                Self::internal("failed to encode pagination token").with_source(token_error)
            }
            PaginationError::Store(store_error) => {
                Self::database(store_error.context.clone()).with_source(store_error)
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        Self::database(error.context.clone()).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => Self::new(
                ErrorCode::ResourceUnavailable,
                "database connection pool exhausted",
            ),
            other => Self::database(format!("Database operation failed: {other}")).with_source(other),
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if self.code.is_server_error() {
            tracing::error!(
                code = ?self.code,
                error = %self,
                source = ?self.source,
                "Request failed"
            );
        } else {
            tracing::warn!(code = ?self.code, error = %self, "Request rejected");
        }

        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidCursor.http_status(), 400);
        assert_eq!(ErrorCode::AuthInvalid.http_status(), 401);
        assert_eq!(ErrorCode::AuthMalformed.http_status(), 401);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::RequestTimeout.http_status(), 408);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_pagination_errors_map_to_status() {
        let cases = [
            (
                PaginationError::from_token(TokenError::NonCanonical),
                ErrorCode::InvalidCursor,
            ),
            (PaginationError::ConflictingCursors, ErrorCode::InvalidInput),
            (
                PaginationError::InvalidPageSize {
                    requested: 0,
                    max: 20,
                },
                ErrorCode::InvalidInput,
            ),
            (PaginationError::NotFound, ErrorCode::ResourceNotFound),
            (
                PaginationError::Store(StoreError::message("fetch sleep page")),
                ErrorCode::DatabaseError,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(AppError::from(error).code, expected);
        }
    }

    #[test]
    fn test_not_found_message_matches_list_contract() {
        let error = AppError::from(PaginationError::NotFound);
        assert_eq!(error.message, "no results found");
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::invalid_cursor("bad token").with_request_id("req-123");
        let json = serde_json::to_value(ErrorResponse::from(&error)).unwrap();

        assert_eq!(json["error"]["code"], "INVALID_CURSOR");
        assert_eq!(json["error"]["message"], "bad token");
        assert_eq!(json["error"]["request_id"], "req-123");
    }

    #[test]
    fn test_error_response_omits_missing_request_id() {
        let json = serde_json::to_value(ErrorResponse::from(&AppError::not_found("Record"))).unwrap();
        assert!(json["error"].get("request_id").is_none());
        assert_eq!(json["error"]["message"], "Record not found");
    }

    #[test]
    fn test_source_chain_is_preserved() {
        use std::error::Error;

        let error = AppError::from(TokenError::Overflow);
        assert_eq!(error.code, ErrorCode::InvalidInput);
        assert!(error.source().is_some());
    }
}
