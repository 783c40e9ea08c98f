// ABOUTME: Main library entry point for the Vitals health-metrics API
// ABOUTME: Read-only REST API over daily sleep, heart rate, SpO2 and stress records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

#![deny(unsafe_code)]

//! # Vitals API
//!
//! Serves daily health-metric summaries over HTTP. Records are addressed by
//! opaque tokens rather than row ids, and list endpoints page through records
//! newest first with stateless `next_token` / `previous_token` cursors.
//!
//! ## Architecture
//!
//! - **`vitals-core`**: errors, the opaque id codec, the pagination engine and
//!   the record models, re-exported here
//! - **database**: `SQLite` pool and one typed store per metric table
//! - **routes**: health probes and the per-metric endpoints
//! - **middleware**: bearer JWT authentication, CORS, request ids, deadlines
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use vitals_api::config::ServerConfig;
//! use vitals_api::database::Database;
//! use vitals_api::errors::AppResult;
//! use vitals_api::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database).await?;
//!     let resources = Arc::new(ServerResources::new(config, database)?);
//!     vitals_api::server::serve(resources).await
//! }
//! ```

/// Bearer JWT verification
pub mod auth;

/// Configuration loaded from the environment
pub mod config;

/// Application constants and environment variable names
pub mod constants;

/// `SQLite` pool and typed metric stores
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for authentication, CORS and request tracing
pub mod middleware;

/// Record models shared by the store and the routes
pub mod models;

/// Reversible opaque identifier codec
pub mod opaque_id;

/// Anchor-based cursor pagination
pub mod pagination;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;
