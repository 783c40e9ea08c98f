// ABOUTME: Metric-specific value columns for each record family
// ABOUTME: Sleep, heart rate, SpO2, and stress value structs serialized into record JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

use serde::{Deserialize, Serialize};

/// Nightly sleep summary; durations are in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepValues {
    /// Overall sleep score
    pub rating: i64,
    /// Total time asleep
    pub total_sleep: i64,
    /// Time in deep sleep
    pub deep_sleep: i64,
    /// Time in light sleep
    pub light_sleep: i64,
    /// Time in REM sleep
    pub rem_sleep: i64,
}

/// Daily heart-rate summary in beats per minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateValues {
    /// Lowest reading of the day
    pub low: i64,
    /// Highest reading of the day
    pub high: i64,
    /// Average reading of the day
    pub average: i64,
}

/// Daily blood-oxygen saturation summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spo2Values {
    /// Average saturation, in percent
    pub average_spo2: f64,
}

/// Daily stress summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressValues {
    /// Seconds spent in the high-stress band
    pub high_stress_duration: i64,
}
