// ABOUTME: Core types for the Vitals health-metrics API
// ABOUTME: Foundation crate with error handling, opaque id codec, cursor pagination, and models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

#![deny(unsafe_code)]

//! # Vitals Core
//!
//! Foundation crate shared by the Vitals API server. It holds the types that
//! change rarely, so the HTTP and database layers can be rebuilt without
//! recompiling it.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the codec/pagination domain errors
//! - **opaque_id**: reversible encoding of row identifiers into public tokens
//! - **pagination**: anchor-based cursor pagination over a `PageStore`
//! - **models**: row identifiers and metric record types
//! - **constants**: defaults and environment variable names

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Reversible opaque identifier codec
pub mod opaque_id;

/// Anchor-based cursor pagination engine
pub mod pagination;

/// Core data models (row ids, metric records)
pub mod models;
