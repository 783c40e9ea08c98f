// ABOUTME: Shared server resources injected into every handler and middleware
// ABOUTME: Bundles configuration, the database, the id codec, the paginator and the JWT verifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::config::ServerConfig;
use crate::constants::env_config;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::opaque_id::IdCodec;
use crate::pagination::CursorPaginator;

/// Everything a request handler needs, built once at startup
pub struct ServerResources {
    /// Immutable server configuration
    pub config: Arc<ServerConfig>,
    /// Pooled record store
    pub database: Arc<Database>,
    /// Opaque id codec shared by handlers and the paginator
    pub codec: Arc<IdCodec>,
    /// List pagination engine
    pub paginator: CursorPaginator,
    /// Bearer token verifier
    pub jwt_verifier: JwtVerifier,
}

impl ServerResources {
    /// Assemble resources from validated configuration and an open database
    ///
    /// # Errors
    ///
    /// Returns an error if the token codec configuration is unusable
    pub fn new(config: ServerConfig, database: Database) -> AppResult<Self> {
        let codec = Arc::new(
            IdCodec::new(&config.tokens)
                .map_err(|e| AppError::config_invalid(env_config::TOKEN_ALPHABET, e))?,
        );
        let paginator = CursorPaginator::new(Arc::clone(&codec), config.list_row_limit);
        let jwt_verifier = JwtVerifier::new(&config.auth);

        Ok(Self {
            config: Arc::new(config),
            database: Arc::new(database),
            codec,
            paginator,
            jwt_verifier,
        })
    }
}
