// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Rule administration handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use warden_core::RawRule;

use crate::error::{ApiError, ApiResult};
use crate::extractors::Pagination;
use crate::response::MessageResponse;
use crate::state::AppState;

// =============================================================================
// Add Role
// =============================================================================

/// Add-role request body.
#[derive(Debug, Deserialize)]
pub struct AddRoleRequest {
    /// Subject receiving the role (a user, or a role for inheritance).
    pub subject: String,
    /// Granted role.
    pub role: String,
}

/// POST /add-role
///
/// Appends a role-assignment rule.
pub async fn add_role(
    State(state): State<AppState>,
    Json(request): Json<AddRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.subject.is_empty() || request.role.is_empty() {
        return Err(ApiError::bad_request("Subject and role are required"));
    }

    state
        .store()
        .add_role_for_subject(&request.subject, &request.role)
        .await?;

    Ok(MessageResponse::new(format!(
        "Role {} assigned to {}",
        request.role, request.subject
    )))
}

// =============================================================================
// Add Policy
// =============================================================================

/// Add-policy request body.
#[derive(Debug, Deserialize)]
pub struct AddPolicyRequest {
    /// Role the rule grants to.
    pub role: String,
    /// Resource the rule covers.
    pub resource: String,
    /// Action verb (case-normalized on write).
    pub action: String,
}

/// POST /add-policy
///
/// Appends a policy rule.
pub async fn add_policy(
    State(state): State<AppState>,
    Json(request): Json<AddPolicyRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.role.is_empty() || request.resource.is_empty() || request.action.is_empty() {
        return Err(ApiError::bad_request(
            "Role, resource, and action are required",
        ));
    }

    state
        .store()
        .add_policy(&request.role, &request.resource, &request.action)
        .await?;

    Ok(MessageResponse::new(format!(
        "Policy added: {} can {} {}",
        request.role,
        request.action.to_lowercase(),
        request.resource
    )))
}

// =============================================================================
// Raw Rules
// =============================================================================

/// Raw rule create request: the generalized 6-column tuple.
#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    /// Rule type (`"p"` or `"g"`).
    pub ptype: String,
    /// First value column.
    pub v0: String,
    /// Second value column.
    pub v1: String,
    /// Third value column.
    pub v2: String,
    /// Optional fourth value column.
    #[serde(default)]
    pub v3: Option<String>,
    /// Optional fifth value column.
    #[serde(default)]
    pub v4: Option<String>,
    /// Optional sixth value column.
    #[serde(default)]
    pub v5: Option<String>,
}

/// POST /rules
///
/// Creates a raw rule row and returns it with its assigned id.
pub async fn create_rule(
    State(state): State<AppState>,
    Json(request): Json<CreateRuleRequest>,
) -> ApiResult<Json<RawRule>> {
    if request.ptype.is_empty() {
        return Err(ApiError::bad_request("ptype is required"));
    }

    let row = state
        .store()
        .add_raw(
            &request.ptype,
            [
                Some(request.v0),
                Some(request.v1),
                Some(request.v2),
                request.v3,
                request.v4,
                request.v5,
            ],
        )
        .await?;

    Ok(Json(row))
}

/// GET /rules?offset&limit
///
/// Lists raw rule rows in insertion order.
pub async fn list_rules(
    State(state): State<AppState>,
    Pagination(params): Pagination,
) -> ApiResult<Json<Vec<RawRule>>> {
    let rows = state.store().list_rules(params.offset, params.capped_limit());
    Ok(Json(rows))
}

// =============================================================================
// Tests
// =============================================================================
