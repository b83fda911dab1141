// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Protected demo resources.
//!
//! These handlers carry no logic of their own; they exist so the enforcement
//! gate has something to guard. Reachability is decided entirely by policy.

use axum::response::IntoResponse;

use crate::extractors::Auth;
use crate::response::MessageResponse;

/// GET /admin
pub async fn admin_panel(Auth(identity): Auth) -> impl IntoResponse {
    tracing::debug!(subject = %identity.subject, "Admin panel viewed");
    MessageResponse::new("Welcome to Admin Panel")
}

/// POST /admin
pub async fn create_admin_resource(Auth(_identity): Auth) -> impl IntoResponse {
    MessageResponse::new("Admin Resource Created")
}

/// GET /articles
pub async fn view_articles(Auth(_identity): Auth) -> impl IntoResponse {
    MessageResponse::new("Viewing Articles")
}

/// POST /articles
pub async fn create_article(Auth(_identity): Auth) -> impl IntoResponse {
    MessageResponse::new("Article Created")
}
