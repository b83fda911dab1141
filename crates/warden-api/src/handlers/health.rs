// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Health check handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// GET /health
///
/// Liveness probe; always responds while the process runs.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

/// Readiness response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Overall readiness.
    pub ready: bool,
    /// Policy adapter backing the store.
    pub policy_adapter: &'static str,
    /// Number of loaded rules.
    pub rules: usize,
}

/// GET /ready
///
/// Readiness probe: verifies the policy store's backing adapter is usable.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store();
    Json(ReadyResponse {
        ready: store.health_check().await,
        policy_adapter: store.adapter_name(),
        rules: store.len(),
    })
}
