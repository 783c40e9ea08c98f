// ABOUTME: HTTP route modules for the Vitals API
// ABOUTME: Health probes and the per-metric list, id and date endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

/// Liveness and readiness probes
pub mod health;
/// Metric record endpoints
pub mod metrics;

pub use health::HealthRoutes;
pub use metrics::{EntryResponse, ListQuery, ListResponse, MetricRoutes};
