// ABOUTME: Bearer authentication middleware guarding the metric routes
// ABOUTME: Extracts the Authorization header, verifies the JWT, and stores the claims on the request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::{debug, Span};

use super::tracing::request_id;
use crate::auth::Claims;
use crate::errors::{AppError, ErrorCode};
use crate::resources::ServerResources;

/// Rejection message for a request without credentials
pub const MISSING_HEADER: &str = "Unauthorized: Missing Authorization header";
/// Rejection message for a header that is not `Bearer <token>`
pub const INVALID_FORMAT: &str = "Unauthorized: Invalid Authorization header format";
/// Rejection message for a token that fails verification
pub const INVALID_TOKEN: &str = "Unauthorized: Invalid token";

/// Claims of the verified bearer token, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedToken(pub Claims);

/// Reject the request unless it carries a valid bearer JWT
///
/// # Errors
///
/// Returns a 401 `AppError` when the header is missing, is not a bearer
/// credential, or the token fails verification
pub async fn require_bearer_auth(
    State(resources): State<Arc<ServerResources>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let request_id = request_id(req.headers());
    let reject = |error: AppError| match &request_id {
        Some(id) => error.with_request_id(id.clone()),
        None => error,
    };

    let token = bearer_token(req.headers()).map_err(reject)?;

    let claims = resources.jwt_verifier.verify(token).map_err(|e| {
        debug!("Bearer token rejected: {e}");
        reject(AppError::new(e.error_code(), INVALID_TOKEN).with_source(e))
    })?;

    if let Some(sub) = &claims.sub {
        Span::current().record("subject", sub.as_str());
    }
    req.extensions_mut().insert(AuthenticatedToken(claims));

    Ok(next.run(req).await)
}

/// Pull the raw token out of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::auth_required(MISSING_HEADER))?;

    let value = value
        .to_str()
        .map_err(|_| AppError::new(ErrorCode::AuthMalformed, INVALID_FORMAT))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::new(ErrorCode::AuthMalformed, INVALID_FORMAT)),
    }
}
