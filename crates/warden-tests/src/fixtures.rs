// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Shared test fixtures.

use std::sync::Arc;

use axum::Router;

use warden_api::{
    auth::JwtConfig, ApiConfig, ApiServer, ApiServerBuilder, AppState, TokenService,
};
use warden_core::{Enforcer, MemoryAdapter, PolicyStore};

/// Secret used across the integration tests.
pub const TEST_SECRET: &str = "integration-test-secret-key-32-bytes-plus";

/// Creates a JWT configuration with the shared test secret.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

/// Creates an API configuration suitable for router tests.
pub fn test_api_config() -> ApiConfig {
    ApiConfig::default().with_jwt(test_jwt_config())
}

/// Creates an empty in-memory policy store.
pub async fn empty_store() -> Arc<PolicyStore> {
    Arc::new(
        PolicyStore::load(Arc::new(MemoryAdapter::new()))
            .await
            .expect("memory store loads"),
    )
}

/// Creates a store seeded with the demo policy:
/// admin may GET/POST `/admin`, everyone with role `user` may GET `/articles`,
/// and admin inherits nothing (flat demo model).
pub async fn seeded_store() -> Arc<PolicyStore> {
    let store = empty_store().await;
    store
        .add_policy("admin", "/admin", "get")
        .await
        .expect("seed rule");
    store
        .add_policy("admin", "/admin", "post")
        .await
        .expect("seed rule");
    store
        .add_policy("user", "/articles", "get")
        .await
        .expect("seed rule");
    store
}

/// Builds a server around the given store, with demo users and admin routes
/// gated by policy.
pub fn test_server(store: Arc<PolicyStore>) -> ApiServer {
    ApiServerBuilder::new()
        .config(test_api_config())
        .store(store)
        .build()
        .expect("server builds")
}

/// Builds the full router over a seeded store.
pub async fn seeded_router() -> Router {
    test_server(seeded_store().await).router()
}

/// Builds an app state over the given store, for handler-level tests.
pub fn test_state(store: Arc<PolicyStore>) -> AppState {
    AppState::builder()
        .config(test_api_config())
        .store(store.clone())
        .enforcer(Arc::new(Enforcer::new(store)))
        .build()
        .expect("state builds")
}

/// A token service sharing the test secret, for minting tokens directly.
pub fn test_token_service() -> TokenService {
    TokenService::new(test_jwt_config()).expect("token service builds")
}
