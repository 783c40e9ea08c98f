// ABOUTME: Configuration module for the Vitals API server
// ABOUTME: Exposes the environment-driven ServerConfig and the database settings it embeds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! Configuration is read once at process start and shared behind an `Arc`.
//! Nothing in here is mutated after [`ServerConfig::from_env`] returns.

/// Database location and pool settings
pub mod database;
/// Environment and server configuration
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{AuthConfig, Environment, HttpConfig, ServerConfig};
