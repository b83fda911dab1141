// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Middleware for the API server.
//!
//! The enforcement gate is the single interception point where every request
//! is authenticated and authorized before it reaches a handler:
//!
//! - [`EnforceLayer`]: token verification + policy enforcement

mod enforce;

pub use enforce::{EnforceLayer, EnforceMiddleware};
