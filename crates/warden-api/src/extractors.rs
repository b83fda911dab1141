// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::auth::Identity;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Pulls the [`Identity`] bound by the enforcement gate out of request
/// extensions. Returns 401 if the request never passed the gate.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(identity): Auth) -> impl IntoResponse {
///     format!("Hello, {}", identity.subject)
/// }
/// ```
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .filter(|identity| identity.is_authenticated())
            .map(Auth)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// =============================================================================
// Pagination Extractor
// =============================================================================

/// Query parameters for offset/limit pagination.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PaginationParams {
    /// Rows to skip from the start of the listing.
    #[serde(default)]
    pub offset: usize,
    /// Maximum rows to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl PaginationParams {
    /// Returns the limit, capped to keep listings bounded.
    pub fn capped_limit(&self) -> usize {
        self.limit.min(100)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// Extractor for pagination parameters.
pub struct Pagination(pub PaginationParams);

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid pagination parameters: {}", e)))?;

        Ok(Pagination(params))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.offset, 0);
        assert_eq!(params.limit, 10);
    }

    #[test]
    fn test_pagination_limit_cap() {
        let params = PaginationParams {
            offset: 0,
            limit: 500,
        };
        assert_eq!(params.capped_limit(), 100);
    }
}
