// ABOUTME: Environment-based server configuration loaded once at startup
// ABOUTME: Reads HTTP, database, pagination, token codec and JWT settings with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::env;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::database::{DatabaseConfig, DatabaseUrl};
use crate::constants::{database, env_config, pagination, ports, timeouts, tokens};
use crate::errors::{AppError, AppResult};
use crate::opaque_id::{IdCodec, IdCodecConfig};

/// Shortest JWT secret accepted without a startup warning
const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback to development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
            Self::Testing => f.write_str("testing"),
        }
    }
}

/// Bearer token verification settings
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// HMAC secret the tokens are signed with
    pub jwt_secret: String,
    /// Required `aud` claim
    pub audience: Option<String>,
    /// Required `iss` claim
    pub issuer: Option<String>,
    /// Required `jti` claim
    pub unique_id: Option<String>,
}

impl Debug for AuthConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("unique_id", &self.unique_id)
            .finish()
    }
}

/// HTTP layer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Listening port
    pub port: u16,
    /// Whole-request deadline in seconds
    pub request_timeout_secs: u64,
    /// Allowed CORS origins; `*` allows any
    pub cors_allowed_origins: Vec<String>,
}

impl HttpConfig {
    /// Request deadline as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// True when any origin is allowed
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP settings
    pub http: HttpConfig,
    /// Record store settings
    pub database: DatabaseConfig,
    /// Largest page a list request may return
    pub list_row_limit: usize,
    /// Opaque id codec settings
    pub tokens: IdCodecConfig,
    /// JWT verification settings
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment and an optional `.env` file
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails to parse, a required value is
    /// missing, or the result fails [`Self::validate`]
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::from_env`]
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_key = if lookup(env_config::HTTP_PORT).is_some() {
            env_config::HTTP_PORT
        } else {
            env_config::LISTENING_PORT
        };

        let config = Self {
            environment: Environment::from_str_or_default(
                &lookup(env_config::ENVIRONMENT).unwrap_or_default(),
            ),
            http: HttpConfig {
                port: parse_or(&lookup, port_key, ports::DEFAULT_HTTP_PORT)?,
                request_timeout_secs: parse_or(
                    &lookup,
                    env_config::REQUEST_TIMEOUT_SECS,
                    timeouts::DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
                cors_allowed_origins: parse_origins(
                    &lookup(env_config::CORS_ALLOWED_ORIGINS).unwrap_or_else(|| "*".to_owned()),
                ),
            },
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(
                    &lookup(env_config::DATABASE_URL)
                        .unwrap_or_else(|| database::DEFAULT_DATABASE_URL.to_owned()),
                )?,
                max_connections: parse_or(
                    &lookup,
                    env_config::DATABASE_MAX_CONNECTIONS,
                    database::DEFAULT_MAX_CONNECTIONS,
                )?,
                acquire_timeout_secs: parse_or(
                    &lookup,
                    env_config::DATABASE_ACQUIRE_TIMEOUT_SECS,
                    timeouts::DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS,
                )?,
                query_timeout_secs: parse_or(
                    &lookup,
                    env_config::DATABASE_QUERY_TIMEOUT_SECS,
                    timeouts::DEFAULT_QUERY_TIMEOUT_SECS,
                )?,
            },
            list_row_limit: parse_or(
                &lookup,
                env_config::LIST_ROW_LIMIT,
                pagination::DEFAULT_LIST_ROW_LIMIT,
            )?,
            tokens: IdCodecConfig {
                alphabet: lookup(env_config::TOKEN_ALPHABET)
                    .unwrap_or_else(|| tokens::DEFAULT_TOKEN_ALPHABET.to_owned()),
                min_length: parse_or(
                    &lookup,
                    env_config::TOKEN_MIN_LENGTH,
                    tokens::DEFAULT_TOKEN_MIN_LENGTH,
                )?,
            },
            auth: AuthConfig {
                jwt_secret: lookup(env_config::JWT_SECRET_KEY)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| AppError::config_missing(env_config::JWT_SECRET_KEY))?,
                audience: non_empty(lookup(env_config::JWT_AUDIENCE)),
                issuer: non_empty(lookup(env_config::JWT_ISSUER)),
                unique_id: non_empty(lookup(env_config::JWT_UNIQUE_ID)),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns an error when a value is out of range, the token alphabet is
    /// unusable, or production requirements are not met
    pub fn validate(&self) -> AppResult<()> {
        if self.list_row_limit == 0 || self.list_row_limit > pagination::MAX_LIST_ROW_LIMIT {
            return Err(AppError::config_invalid(
                env_config::LIST_ROW_LIMIT,
                format!(
                    "must be between 1 and {}, got {}",
                    pagination::MAX_LIST_ROW_LIMIT,
                    self.list_row_limit
                ),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::config_invalid(
                env_config::DATABASE_MAX_CONNECTIONS,
                "must be at least 1",
            ));
        }

        if self.http.request_timeout_secs == 0 {
            return Err(AppError::config_invalid(
                env_config::REQUEST_TIMEOUT_SECS,
                "must be at least 1",
            ));
        }

        IdCodec::new(&self.tokens)
            .map_err(|e| AppError::config_invalid(env_config::TOKEN_ALPHABET, e))?;

        if self.auth.jwt_secret.len() < RECOMMENDED_SECRET_BYTES {
            warn!(
                "{} is shorter than {RECOMMENDED_SECRET_BYTES} bytes",
                env_config::JWT_SECRET_KEY
            );
        }

        if self.environment.is_production() {
            if self.http.allows_any_origin() {
                return Err(AppError::config_invalid(
                    env_config::CORS_ALLOWED_ORIGINS,
                    "wildcard origin is not allowed in production",
                ));
            }
            for (key, value) in [
                (env_config::JWT_AUDIENCE, &self.auth.audience),
                (env_config::JWT_ISSUER, &self.auth.issuer),
                (env_config::JWT_UNIQUE_ID, &self.auth.unique_id),
            ] {
                if value.is_none() {
                    return Err(AppError::config_missing(key));
                }
            }
        }

        Ok(())
    }

    /// Secret-free, human-readable overview for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Vitals API Configuration:\n\
             - Environment: {}\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Pool: {} connections, acquire {}s, query {}s\n\
             - List Row Limit: {}\n\
             - Token Min Length: {}\n\
             - Request Timeout: {}s\n\
             - CORS Origins: {}\n\
             - JWT Audience: {}\n\
             - JWT Issuer: {}\n\
             - JWT Unique Id: {}",
            self.environment,
            self.http.port,
            self.database.url,
            self.database.max_connections,
            self.database.acquire_timeout_secs,
            self.database.query_timeout_secs,
            self.list_row_limit,
            self.tokens.min_length,
            self.http.request_timeout_secs,
            self.http.cors_allowed_origins.join(", "),
            presence(self.auth.audience.as_ref()),
            presence(self.auth.issuer.as_ref()),
            presence(self.auth.unique_id.as_ref()),
        )
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config_invalid(key, format!("'{raw}': {e}"))),
        _ => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    if origins.is_empty() {
        vec!["*".to_owned()]
    } else {
        origins
    }
}

const fn presence(value: Option<&String>) -> &'static str {
    if value.is_some() {
        "enforced"
    } else {
        "not enforced"
    }
}
