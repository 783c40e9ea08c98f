// ABOUTME: Re-exports constants from vitals-core for unified type identity
// ABOUTME: Keeps defaults and environment variable names defined in one place for all workspace crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

pub use vitals_core::constants::*;
