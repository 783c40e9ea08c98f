// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the axum request harness and in-memory server fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
pub mod test_utils;
