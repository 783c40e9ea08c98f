// ABOUTME: Bearer JWT verification for the metric endpoints
// ABOUTME: Validates HS256 signature, expiry, audience, issuer and the pinned jti claim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! # Bearer Authentication
//!
//! Every metric request carries a JWT signed with the shared `JWT_SECRET_KEY`.
//! A token is accepted when its signature, `exp`, `nbf`, `aud`, `iss` and `jti`
//! all check out against [`AuthConfig`]. Claims that are not configured are not
//! enforced.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Claims carried by an API bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, usually the device or account name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Not-before, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Token identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Claims valid from now until `expires_at`
    #[must_use]
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: None,
            aud: None,
            iss: None,
            exp: expires_at.timestamp(),
            nbf: Some(now),
            iat: Some(now),
            jti: None,
        }
    }

    /// Claims matching every check the verifier enforces
    #[must_use]
    pub fn for_config(config: &AuthConfig, expires_at: DateTime<Utc>) -> Self {
        Self {
            aud: config.audience.clone(),
            iss: config.issuer.clone(),
            jti: config.unique_id.clone(),
            ..Self::new(expires_at)
        }
    }
}

/// Why a bearer token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtValidationError {
    /// `exp` is in the past
    #[error("token expired at {expired_at}")]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Signature or a claim check failed
    #[error("token rejected: {reason}")]
    TokenInvalid {
        /// Which check failed
        reason: String,
    },
    /// Not a decodable JWT
    #[error("token malformed: {details}")]
    TokenMalformed {
        /// What could not be decoded
        details: String,
    },
}

impl JwtValidationError {
    /// Error code reported for this rejection
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::TokenExpired { .. } => ErrorCode::AuthExpired,
            Self::TokenInvalid { .. } => ErrorCode::AuthInvalid,
            Self::TokenMalformed { .. } => ErrorCode::AuthMalformed,
        }
    }
}

/// Verifies (and, for tooling, issues) HS256 bearer tokens
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
    unique_id: Option<String>,
}

impl JwtVerifier {
    /// Build a verifier from the auth configuration
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
            unique_id: config.unique_id.clone(),
        }
    }

    /// Validate a bearer token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] when the token is malformed, expired,
    /// not yet valid, wrongly signed, or carries an unexpected `aud`, `iss`
    /// or `jti`
    pub fn verify(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))?;

        if let Some(expected) = &self.unique_id {
            if claims.jti.as_deref() != Some(expected.as_str()) {
                warn!("JWT jti claim does not match the configured unique id");
                return Err(JwtValidationError::TokenInvalid {
                    reason: "unexpected jti".into(),
                });
            }
        }

        debug!(sub = ?claims.sub, "Bearer token accepted");
        Ok(claims)
    }

    /// Sign claims with the configured secret
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn issue(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign JWT: {e}")))
    }

    fn convert_jwt_error(e: &JwtError) -> JwtValidationError {
        warn!("JWT token validation failed: {e}");

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Utc::now(),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "signature verification failed".into(),
            },
            ErrorKind::ImmatureSignature => JwtValidationError::TokenInvalid {
                reason: "token is not valid yet".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "unexpected audience".into(),
            },
            ErrorKind::InvalidIssuer => JwtValidationError::TokenInvalid {
                reason: "unexpected issuer".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "token format is invalid".into(),
            },
            ErrorKind::Base64(err) => JwtValidationError::TokenMalformed {
                details: format!("invalid base64: {err}"),
            },
            ErrorKind::Json(err) => JwtValidationError::TokenMalformed {
                details: format!("invalid JSON: {err}"),
            },
            ErrorKind::Utf8(err) => JwtValidationError::TokenMalformed {
                details: format!("invalid UTF-8: {err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("validation failed: {e}"),
            },
        }
    }
}
