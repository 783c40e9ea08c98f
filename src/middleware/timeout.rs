// ABOUTME: Whole-request deadline middleware
// ABOUTME: Aborts handlers that exceed the configured request timeout with a 408 error body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::time::timeout;
use tracing::warn;

use super::tracing::request_id;
use crate::errors::{AppError, ErrorCode};

/// Cancel the request if it runs longer than `limit`
///
/// Dropping the handler future releases any pooled connection it holds.
///
/// # Errors
///
/// Returns a `RequestTimeout` error once the deadline passes
pub async fn request_timeout(
    State(limit): State<Duration>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let request_id = request_id(req.headers());
    let path = req.uri().path().to_owned();

    timeout(limit, next.run(req)).await.map_err(|_| {
        warn!(path = %path, timeout_secs = limit.as_secs(), "Request timed out");
        let error = AppError::new(
            ErrorCode::RequestTimeout,
            format!("Request timed out after {}s", limit.as_secs()),
        );
        match request_id {
            Some(id) => error.with_request_id(id),
            None => error,
        }
    })
}
