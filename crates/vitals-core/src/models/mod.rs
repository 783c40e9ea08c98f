// ABOUTME: Core data models for health-metric records
// ABOUTME: Row identifiers, metric kinds, and the generic dated record envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! # Data Models
//!
//! Every metric table shares the same shape: a row identifier, a calendar
//! date, creation/update timestamps, and a handful of metric-specific value
//! columns. [`MetricEntry`] carries the shared part and is generic over the
//! value struct.

mod metrics;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TokenError;

pub use metrics::{HeartRateValues, SleepValues, Spo2Values, StressValues};

/// Primary key of a metric record.
///
/// Always non-negative. `0` never names a stored row and is treated as
/// "no anchor" by the pagination engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(i64);

impl RowId {
    /// The "no row" value
    pub const SENTINEL: Self = Self(0);

    /// Raw value as stored in the database
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Value as fed to the token codec
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// True when this identifier cannot name a stored row
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.0 < 1
    }
}

impl TryFrom<i64> for RowId {
    type Error = TokenError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(TokenError::NumberOutOfRange {
                value: i128::from(value),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<u64> for RowId {
    type Error = TokenError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| TokenError::NumberOutOfRange {
                value: i128::from(value),
            })
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four metric families exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Nightly sleep summary
    Sleep,
    /// Daily heart-rate summary
    HeartRate,
    /// Daily blood-oxygen summary
    Spo2,
    /// Daily stress summary
    Stress,
}

impl MetricKind {
    /// All metric kinds, in route registration order
    pub const ALL: [Self; 4] = [Self::Sleep, Self::HeartRate, Self::Spo2, Self::Stress];

    /// URL path segment for this metric
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::HeartRate => "heartrate",
            Self::Spo2 => "spo2",
            Self::Stress => "stress",
        }
    }

    /// Backing table name
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::HeartRate => "heart_rate",
            Self::Spo2 => "spo2",
            Self::Stress => "stress",
        }
    }

    /// Human-readable record name used in error messages
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sleep => "Sleep record",
            Self::HeartRate => "Heart rate record",
            Self::Spo2 => "SpO2 record",
            Self::Stress => "Stress record",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A stored metric record with its shared columns
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry<V> {
    /// Primary key, never exposed to API consumers directly
    pub id: RowId,
    /// Calendar day the record summarizes
    pub date: NaiveDate,
    /// Metric-specific values
    pub values: V,
    /// When the record was first stored
    pub created_timestamp: DateTime<Utc>,
    /// When the record was last changed
    pub updated_timestamp: DateTime<Utc>,
}

impl<V> MetricEntry<V> {
    /// Transform the value part while keeping the shared columns
    pub fn map_values<W>(self, f: impl FnOnce(V) -> W) -> MetricEntry<W> {
        MetricEntry {
            id: self.id,
            date: self.date,
            values: f(self.values),
            created_timestamp: self.created_timestamp,
            updated_timestamp: self.updated_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_id_rejects_negative_values() {
        assert_eq!(
            RowId::try_from(-1_i64),
            Err(TokenError::NumberOutOfRange { value: -1 })
        );
        assert_eq!(RowId::try_from(42_i64).map(RowId::get), Ok(42));
    }

    #[test]
    fn test_row_id_rejects_values_beyond_i64() {
        let too_big = u64::try_from(i64::MAX).unwrap() + 1;
        assert!(matches!(
            RowId::try_from(too_big),
            Err(TokenError::NumberOutOfRange { .. })
        ));
    }

    #[test]
    fn test_sentinel_detection() {
        assert!(RowId::SENTINEL.is_sentinel());
        assert!(!RowId::try_from(1_i64).unwrap().is_sentinel());
    }

    #[test]
    fn test_metric_kind_paths() {
        let segments: Vec<_> = MetricKind::ALL.iter().map(|k| k.path_segment()).collect();
        assert_eq!(segments, ["sleep", "heartrate", "spo2", "stress"]);
        assert_eq!(MetricKind::HeartRate.table_name(), "heart_rate");
    }
}
