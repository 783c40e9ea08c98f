// ABOUTME: Pooled SQLite access for the metric record tables
// ABOUTME: Opens the pool, creates the schema, and hands out typed metric stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! # Database Management
//!
//! One `SqlitePool` is opened at startup and shared by every request. Each
//! store read borrows a pooled connection for a single statement and returns
//! it when the query future completes or is dropped.

mod metrics;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

pub use metrics::{MetricStore, MetricValues};

use crate::config::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};
use crate::models::MetricKind;

/// Database manager for the metric tables
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl Database {
    /// Open the pool and create any missing tables
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be created or opened, or
    /// if schema creation fails
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let connect_options = Self::connect_options(&config.url).await?;

        let pool_options = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout());
        // Every connection to `:memory:` is a separate database; keep exactly one alive
        let pool_options = if config.url.is_memory() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open {}: {e}", config.url)))?;

        let database = Self {
            pool,
            query_timeout: config.query_timeout(),
        };
        database.migrate().await?;

        info!(url = %config.url, "Database ready");
        Ok(database)
    }

    async fn connect_options(url: &DatabaseUrl) -> AppResult<SqliteConnectOptions> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Self::ensure_directory(parent).await?;
            }
        }

        SqliteConnectOptions::from_str(&url.to_connection_string())
            .map(|options| options.create_if_missing(true))
            .map_err(|e| AppError::config_invalid("DATABASE_URL", e))
    }

    async fn ensure_directory(dir: &Path) -> AppResult<()> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::database(format!(
                "Failed to create database directory {}: {e}",
                dir.display()
            ))
        })
    }

    /// Get a reference to the pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Deadline applied to each store query
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Typed store for one metric table
    #[must_use]
    pub fn metric_store<V: MetricValues>(&self) -> MetricStore<V> {
        MetricStore::new(self.pool.clone(), self.query_timeout)
    }

    /// Create the metric tables and their ordering indexes
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for kind in MetricKind::ALL {
            for statement in schema_for(kind) {
                sqlx::query(&statement)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::database(format!(
                            "Failed to create {} table: {e}",
                            kind.table_name()
                        ))
                    })?;
            }
            debug!(table = kind.table_name(), "Table ready");
        }
        Ok(())
    }

    /// Round-trip a trivial query through the pool
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be acquired or the query fails
    pub async fn ping(&self) -> AppResult<()> {
        tokio::time::timeout(self.query_timeout, sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map_err(|_| AppError::database("Database ping timed out"))?
            .map(|_| ())
            .map_err(AppError::from)
    }
}

/// DDL for one metric table: the table itself and the list-order index
fn schema_for(kind: MetricKind) -> [String; 2] {
    let table = kind.table_name();
    let value_columns = metrics::column_definitions(kind)
        .iter()
        .map(|(name, sql_type)| format!("{name} {sql_type} NOT NULL"))
        .collect::<Vec<_>>()
        .join(",\n                ");

    [
        format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL UNIQUE,
                {value_columns},
                created_timestamp TEXT NOT NULL,
                updated_timestamp TEXT NOT NULL
            )
            "
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_date_id ON {table} (date DESC, id DESC)"),
    ]
}
