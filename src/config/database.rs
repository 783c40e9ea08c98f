// ABOUTME: Database configuration types for the SQLite record store
// ABOUTME: Parses DATABASE_URL and carries pool sizing and per-query timeout settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{database, timeouts};
use crate::errors::{AppError, AppResult};

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// Accepts `sqlite:<path>`, `sqlite://<path>`, `sqlite::memory:` and a
    /// bare file path.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty value or a non-`SQLite` scheme
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AppError::config_invalid("DATABASE_URL", "value is empty"));
        }

        if let Some(rest) = trimmed.strip_prefix("sqlite:") {
            let path_str = rest.strip_prefix("//").unwrap_or(rest);
            return if path_str == ":memory:" || path_str.is_empty() {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            };
        }

        if trimmed.contains("://") {
            return Err(AppError::config_invalid(
                "DATABASE_URL",
                format!("unsupported scheme in '{trimmed}', only sqlite is available"),
            ));
        }

        Ok(Self::SQLite {
            path: PathBuf::from(trimmed),
        })
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(database::DEFAULT_DATABASE_URL).unwrap_or(Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Seconds to wait for a free pooled connection
    pub acquire_timeout_secs: u64,
    /// Seconds a single store query may run
    pub query_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Configuration for an in-memory database, used by tests and tooling
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: DatabaseUrl::Memory,
            ..Self::default()
        }
    }

    /// Pool acquire timeout as a `Duration`
    #[must_use]
    pub const fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Per-query timeout as a `Duration`
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            max_connections: database::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: timeouts::DEFAULT_DATABASE_ACQUIRE_TIMEOUT_SECS,
            query_timeout_secs: timeouts::DEFAULT_QUERY_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_variants() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/vitals.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/vitals.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:///var/lib/vitals.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("/var/lib/vitals.db")
            }
        );
        assert!(DatabaseUrl::parse_url("sqlite::memory:").unwrap().is_memory());
        assert_eq!(
            DatabaseUrl::parse_url("vitals.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("vitals.db")
            }
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        let err = DatabaseUrl::parse_url("postgres://localhost/vitals").unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigInvalid);
        assert!(DatabaseUrl::parse_url("  ").is_err());
    }

    #[test]
    fn test_connection_string_round_trip() {
        let url = DatabaseUrl::parse_url("sqlite:./data/vitals.db").unwrap();
        assert_eq!(url.to_connection_string(), "sqlite:./data/vitals.db");
        assert_eq!(DatabaseUrl::Memory.to_string(), "sqlite::memory:");
    }
}
