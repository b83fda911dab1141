// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::handlers;
use crate::middleware::EnforceLayer;
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// Entry point for building the router and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);

        let mut public_paths = vec![
            "/health".to_string(),
            "/ready".to_string(),
            "/token".to_string(),
        ];
        if !self.config.guard_admin_routes {
            // Bootstrap exception: expose the mutation routes ungated, as the
            // reference behavior did.
            public_paths.extend([
                "/add-role".to_string(),
                "/add-policy".to_string(),
                "/rules".to_string(),
            ]);
        }

        let enforce = EnforceLayer::new(
            self.state.tokens().clone(),
            self.state.enforcer().clone(),
        )
        .with_public_paths(public_paths);

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(cors)
            .layer(enforce);

        Router::new()
            // Health endpoints (public)
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Token issuance (public)
            .route("/token", post(handlers::issue_token))
            // Rule administration (gated unless the bootstrap exception is on)
            .route("/add-role", post(handlers::add_role))
            .route("/add-policy", post(handlers::add_policy))
            .route("/rules", post(handlers::create_rule).get(handlers::list_rules))
            // Protected demo resources
            .route(
                "/admin",
                get(handlers::admin_panel).post(handlers::create_admin_resource),
            )
            .route(
                "/articles",
                get(handlers::view_articles).post(handlers::create_article),
            )
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    CorsLayer::new()
        .max_age(Duration::from_secs(cors.max_age))
        .allow_origin(Any)
        .allow_methods(methods)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the policy store.
    pub fn store(mut self, store: Arc<warden_core::PolicyStore>) -> Self {
        self.state_builder = self.state_builder.store(store);
        self
    }

    /// Sets the enforcer.
    pub fn enforcer(mut self, enforcer: Arc<warden_core::Enforcer>) -> Self {
        self.state_builder = self.state_builder.enforcer(enforcer);
        self
    }

    /// Sets the token service.
    pub fn tokens(mut self, tokens: Arc<crate::auth::TokenService>) -> Self {
        self.state_builder = self.state_builder.tokens(tokens);
        self
    }

    /// Sets the credential directory.
    pub fn directory(mut self, directory: Arc<crate::auth::UserDirectory>) -> Self {
        self.state_builder = self.state_builder.directory(directory);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use warden_core::{MemoryAdapter, PolicyStore};

    async fn test_server() -> ApiServer {
        let store = Arc::new(
            PolicyStore::load(Arc::new(MemoryAdapter::new()))
                .await
                .unwrap(),
        );

        ApiServerBuilder::new()
            .config(ApiConfig::default().with_jwt(JwtConfig::new(
                "test-secret-key-that-is-long-enough-for-testing",
            )))
            .store(store)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_server_builder() {
        let server = test_server().await;
        assert_eq!(server.addr().port(), 8080);
    }

    #[tokio::test]
    async fn test_router_creation() {
        let server = test_server().await;
        let _router = server.router();
    }
}
