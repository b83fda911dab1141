// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Token issuance handler.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::response::AuthResponse;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /token
///
/// Verifies credentials against the directory and returns a signed access
/// token carrying the user's role claim.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let record = state.directory().verify(&request.username, &request.password)?;

    let token = state.tokens().issue(&record.username, &record.role)?;

    tracing::info!(subject = %record.username, role = %record.role, "Token issued");

    Ok(AuthResponse::new(token, state.tokens().expiry_secs()))
}

// =============================================================================
// Tests
// =============================================================================
