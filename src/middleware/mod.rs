// ABOUTME: HTTP middleware for the Vitals API router
// ABOUTME: Bearer authentication, CORS, request deadlines and request tracing layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

/// Bearer JWT authentication for metric routes
pub mod auth;
/// Cross-origin resource sharing
pub mod cors;
/// Whole-request deadline
pub mod timeout;
/// Request ids and per-request spans
pub mod tracing;

pub use auth::{require_bearer_auth, AuthenticatedToken};
pub use cors::setup_cors;
pub use timeout::request_timeout;
pub use self::tracing::{propagate_request_id_layer, set_request_id_layer, trace_layer};
