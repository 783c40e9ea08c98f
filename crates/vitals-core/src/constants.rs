// ABOUTME: Application constants organized by domain
// ABOUTME: Token codec defaults, list limits, ports, and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! Constants module
//!
//! Pure data constants grouped by domain. Anything that can be overridden at
//! runtime has its environment variable name in [`env_config`].

/// Opaque token codec defaults
pub mod tokens {
    /// Permuted URL-safe alphabet used to render row identifiers.
    ///
    /// Changing it invalidates every token issued before the change.
    pub const DEFAULT_TOKEN_ALPHABET: &str =
        "YOUr83qA5u9_WRBgyNXHjKLDwtzIdPe1boTJESlQshpF-nV0viMkfC6xZ24G7cam";
    /// Default minimum rendered token length
    pub const DEFAULT_TOKEN_MIN_LENGTH: usize = 10;
    /// Smallest alphabet the codec accepts
    pub const MIN_ALPHABET_LENGTH: usize = 3;
    /// Largest minimum length the codec accepts
    pub const MAX_MIN_LENGTH: usize = 255;
}

/// List endpoint limits
pub mod pagination {
    /// Default number of rows returned per list page
    pub const DEFAULT_LIST_ROW_LIMIT: usize = 20;
    /// Hard ceiling on the configurable page size
    pub const MAX_LIST_ROW_LIMIT: usize = 1000;
}

/// Network defaults
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Timeouts
pub mod timeouts {
    /// Default whole-request timeout
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Default wait for a pooled database connection
    pub const DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    /// Per-query deadline applied by the record store
    pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;
}

/// Database defaults
pub mod database {
    /// Default SQLite location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/vitals.db";
    /// Default pool size
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
}

/// Environment variable names
pub mod env_config {
    /// HTTP listening port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Legacy alias for [`HTTP_PORT`]
    pub const LISTENING_PORT: &str = "LISTENING_PORT";
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Pool size
    pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
    /// Pool acquire timeout in seconds
    pub const DATABASE_ACQUIRE_TIMEOUT_SECS: &str = "DATABASE_ACQUIRE_TIMEOUT_SECS";
    /// Per-query timeout in seconds
    pub const DATABASE_QUERY_TIMEOUT_SECS: &str = "DATABASE_QUERY_TIMEOUT_SECS";
    /// Rows per list page
    pub const LIST_ROW_LIMIT: &str = "LIST_ROW_LIMIT";
    /// Token codec alphabet
    pub const TOKEN_ALPHABET: &str = "TOKEN_ALPHABET";
    /// Token codec minimum length
    pub const TOKEN_MIN_LENGTH: &str = "TOKEN_MIN_LENGTH";
    /// HS256 signing secret
    pub const JWT_SECRET_KEY: &str = "JWT_SECRET_KEY";
    /// Expected `aud` claim
    pub const JWT_AUDIENCE: &str = "JWT_AUDIENCE";
    /// Expected `iss` claim
    pub const JWT_ISSUER: &str = "JWT_ISSUER";
    /// Expected `jti` claim
    pub const JWT_UNIQUE_ID: &str = "JWT_UNIQUE_ID";
    /// Whole-request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Comma-separated CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Deployment environment name
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Service identity
pub mod service_names {
    /// Service name reported in logs and health responses
    pub const VITALS_API: &str = "vitals-api";
}
