// ABOUTME: Cursor pagination engine error types
// ABOUTME: Distinguishes client cursor mistakes, exhausted positions, and store failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::error::Error;

use super::TokenError;

/// Failure reported by a `PageStore` implementation.
///
/// The engine never retries; the store error is handed back to the caller as-is.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct StoreError {
    /// What the store was doing when it failed
    pub context: String,
    /// Underlying driver error
    #[source]
    pub source: Box<dyn Error + Send + Sync>,
}

impl StoreError {
    /// Wrap a driver error with a short description of the failed operation
    pub fn new(context: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Store error with no underlying driver error, such as a timeout
    #[must_use]
    pub fn message(context: impl Into<String>) -> Self {
        let context = context.into();
        Self {
            source: Box::from(context.clone()),
            context,
        }
    }
}

/// Errors produced by the cursor pagination engine
#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    /// The cursor could not be resolved to a usable anchor
    #[error("Invalid cursor: {reason}")]
    InvalidCursor {
        /// Why the cursor was rejected
        reason: String,
        /// Codec failure, when the token did not decode
        #[source]
        source: Option<TokenError>,
    },

    /// Both a forward and a backward cursor were supplied
    #[error("Only one of next_token and previous_token may be supplied")]
    ConflictingCursors,

    /// Requested page size is not usable
    #[error("Invalid page size {requested}: must be between 1 and {max}")]
    InvalidPageSize {
        /// Requested page size
        requested: usize,
        /// Configured upper bound
        max: usize,
    },

    /// A cursor was supplied but there is no data at that position
    #[error("no results found")]
    NotFound,

    /// A continuation cursor could not be produced for the page
    #[error("Failed to encode continuation cursor: {0}")]
    Encoding(#[source] TokenError),

    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PaginationError {
    /// Build an invalid-cursor error from a codec failure
    #[must_use]
    pub fn from_token(error: TokenError) -> Self {
        Self::InvalidCursor {
            reason: error.to_string(),
            source: Some(error),
        }
    }

    /// Build an invalid-cursor error for a token that decoded to an unusable anchor
    #[must_use]
    pub fn unusable_anchor(reason: impl Into<String>) -> Self {
        Self::InvalidCursor {
            reason: reason.into(),
            source: None,
        }
    }

    /// True when the caller sent a request that can never succeed as-is
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCursor { .. }
                | Self::ConflictingCursors
                | Self::InvalidPageSize { .. }
                | Self::NotFound
        )
    }
}
