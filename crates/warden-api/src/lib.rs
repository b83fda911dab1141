// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! # warden-api
//!
//! HTTP surface for the Warden RBAC gateway.
//!
//! This crate provides the axum server with the JWT token boundary, the
//! enforcement middleware that authorizes every request against the
//! `warden-core` policy engine, and the admin endpoints that mutate rules.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{Claims, Identity, JwtConfig, TokenService, UserDirectory};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use response::{ApiResponse, AuthResponse, MessageResponse};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
