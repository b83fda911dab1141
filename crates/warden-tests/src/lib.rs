// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! # warden-tests
//!
//! Cross-crate integration tests for the Warden gateway, plus the shared
//! fixtures they build on. The tests live in `tests/`; this library only
//! exports the fixture helpers.

#![warn(missing_docs)]

pub mod fixtures;
