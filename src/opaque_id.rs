// ABOUTME: Re-exports opaque id codec from vitals-core for unified type identity
// ABOUTME: Ensures IdCodec/OpaqueToken are the same types across all workspace crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

pub use vitals_core::opaque_id::*;
