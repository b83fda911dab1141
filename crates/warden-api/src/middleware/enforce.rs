// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! The enforcement gate.
//!
//! Per request: `UNVERIFIED -> IDENTIFIED -> AUTHORIZED | REJECTED`. Token
//! verification failure rejects with 401 before any policy query; a policy
//! DENY rejects with 403. The decision is computed synchronously, exactly
//! once, with no retries.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use warden_core::Enforcer;

use crate::auth::{Identity, TokenService};
use crate::error::ApiError;

// =============================================================================
// EnforceLayer
// =============================================================================

/// Layer applying the enforcement gate to wrapped services.
#[derive(Clone)]
pub struct EnforceLayer {
    tokens: Arc<TokenService>,
    enforcer: Arc<Enforcer>,
    public_paths: Arc<HashSet<String>>,
}

impl EnforceLayer {
    /// Creates a new enforcement layer.
    pub fn new(tokens: Arc<TokenService>, enforcer: Arc<Enforcer>) -> Self {
        Self {
            tokens,
            enforcer,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets the paths that bypass the gate entirely.
    ///
    /// A trailing `*` marks a prefix; anything else is an exact path.
    pub fn with_public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = Arc::new(paths.into_iter().collect());
        self
    }

    /// Adds the default public paths (liveness probes and the token
    /// endpoint, which must be reachable without a token).
    pub fn with_default_public_paths(self) -> Self {
        self.with_public_paths(vec![
            "/health".to_string(),
            "/ready".to_string(),
            "/token".to_string(),
        ])
    }
}

impl<S> Layer<S> for EnforceLayer {
    type Service = EnforceMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        EnforceMiddleware {
            inner,
            tokens: self.tokens.clone(),
            enforcer: self.enforcer.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// EnforceMiddleware
// =============================================================================

/// Middleware that authenticates and authorizes every request.
#[derive(Clone)]
pub struct EnforceMiddleware<S> {
    inner: S,
    tokens: Arc<TokenService>,
    enforcer: Arc<Enforcer>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> EnforceMiddleware<S> {
    /// Checks if a path bypasses the gate.
    fn is_public_path(&self, path: &str) -> bool {
        if self.public_paths.contains(path) {
            return true;
        }

        for public_path in self.public_paths.iter() {
            if let Some(prefix) = public_path.strip_suffix('*') {
                if path.starts_with(prefix) {
                    return true;
                }
            }
        }

        false
    }
}

impl<S> Service<Request<Body>> for EnforceMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = self.tokens.clone();
        let enforcer = self.enforcer.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = Uuid::now_v7();

            if is_public {
                let identity = Identity::anonymous().with_request_id(request_id);
                req.extensions_mut().insert(identity);
                return inner.call(req).await;
            }

            // UNVERIFIED -> IDENTIFIED
            let Some(token) = extract_bearer_token(&req) else {
                tracing::debug!(path = %req.uri().path(), "No authorization token provided");
                return Ok(
                    ApiError::unauthorized("No authorization token provided").into_response()
                );
            };

            let claims = match tokens.verify(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!(path = %req.uri().path(), error = %e, "Token verification failed");
                    return Ok(e.into_response());
                }
            };

            let identity = Identity::from_claims(&claims).with_request_id(request_id);

            // IDENTIFIED -> AUTHORIZED | REJECTED
            //
            // The resource is the target path exactly as received; the action
            // is the verb, case-folded.
            let resource = req.uri().path().to_string();
            let action = req.method().as_str().to_lowercase();

            if !enforcer.enforce(&identity.role, &resource, &action) {
                tracing::warn!(
                    subject = %identity.subject,
                    role = %identity.role,
                    resource = %resource,
                    action = %action,
                    "Access denied"
                );
                return Ok(ApiError::forbidden("Forbidden: Access Denied").into_response());
            }

            req.extensions_mut().insert(identity);
            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::http::StatusCode;
    use std::convert::Infallible;
    use tower::ServiceExt;
    use warden_core::{MemoryAdapter, PolicyStore};

    fn mock_service() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
           + Send {
        tower::service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        })
    }

    async fn gate() -> (Arc<TokenService>, EnforceLayer) {
        let tokens = Arc::new(
            TokenService::new(JwtConfig::new("test-secret-key-that-is-long-enough!!"))
                .unwrap(),
        );
        let store = Arc::new(
            PolicyStore::load(Arc::new(MemoryAdapter::new()))
                .await
                .unwrap(),
        );
        store.add_policy("admin", "/admin", "get").await.unwrap();
        let enforcer = Arc::new(Enforcer::new(store));

        let layer = EnforceLayer::new(tokens.clone(), enforcer).with_default_public_paths();
        (tokens, layer)
    }

    fn request(path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        use axum::http::HeaderValue;

        let mut req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer mytoken123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("mytoken123".to_string()));
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let (_tokens, layer) = gate().await;
        let service = layer.layer(mock_service());

        let response = service.oneshot(request("/admin", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_401() {
        let (_tokens, layer) = gate().await;
        let service = layer.layer(mock_service());

        let response = service
            .oneshot(request("/admin", Some("garbage.token.here")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_denied_role_is_403() {
        let (tokens, layer) = gate().await;
        let service = layer.layer(mock_service());

        let token = tokens.issue("dev", "user").unwrap();
        let response = service
            .oneshot(request("/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_allowed_role_passes() {
        let (tokens, layer) = gate().await;
        let service = layer.layer(mock_service());

        let token = tokens.issue("john", "admin").unwrap();
        let response = service
            .oneshot(request("/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_path_bypasses_gate() {
        let (_tokens, layer) = gate().await;
        let service = layer.layer(mock_service());

        let response = service.oneshot(request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_prefix_patterns() {
        let (tokens, enforce) = gate().await;
        let layer = EnforceLayer::new(
            tokens,
            enforce.enforcer.clone(),
        )
        .with_public_paths(vec!["/docs/*".to_string()]);
        let service = layer.layer(mock_service());

        let response = service
            .oneshot(request("/docs/anything", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
