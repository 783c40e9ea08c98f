// ABOUTME: Re-exports record models from vitals-core for unified type identity
// ABOUTME: Ensures RowId/MetricEntry are the same types across all workspace crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

pub use vitals_core::models::*;
