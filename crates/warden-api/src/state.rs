// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use warden_core::{Enforcer, PolicyStore};

use crate::auth::{TokenService, UserDirectory};
use crate::config::ApiConfig;
use crate::error::ApiResult;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Constructed once at process start; the policy store inside it lives for
/// the process lifetime and is never rebuilt per request.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token service for issuance and verification.
    pub tokens: Arc<TokenService>,
    /// The shared policy store.
    pub store: Arc<PolicyStore>,
    /// The policy evaluator.
    pub enforcer: Arc<Enforcer>,
    /// Credential directory backing /token.
    pub directory: Arc<UserDirectory>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token service.
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Returns the policy store.
    pub fn store(&self) -> &Arc<PolicyStore> {
        &self.store
    }

    /// Returns the enforcer.
    pub fn enforcer(&self) -> &Arc<Enforcer> {
        &self.enforcer
    }

    /// Returns the credential directory.
    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    tokens: Option<Arc<TokenService>>,
    store: Option<Arc<PolicyStore>>,
    enforcer: Option<Arc<Enforcer>>,
    directory: Option<Arc<UserDirectory>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            tokens: None,
            store: None,
            enforcer: None,
            directory: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token service.
    pub fn tokens(mut self, tokens: Arc<TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sets the policy store.
    pub fn store(mut self, store: Arc<PolicyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the enforcer.
    pub fn enforcer(mut self, enforcer: Arc<Enforcer>) -> Self {
        self.enforcer = Some(enforcer);
        self
    }

    /// Sets the credential directory.
    pub fn directory(mut self, directory: Arc<UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Builds the AppState.
    ///
    /// The policy store is required; the token service defaults to one built
    /// from the config's JWT section, the enforcer to an exact-match
    /// enforcer over the store, and the directory to the demo users.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let tokens = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(TokenService::new(config.jwt.clone())?),
        };

        let store = self.store.ok_or_else(|| {
            crate::error::ApiError::internal("AppState requires a policy store")
        })?;

        let enforcer = self
            .enforcer
            .unwrap_or_else(|| Arc::new(Enforcer::new(store.clone())));

        let directory = match self.directory {
            Some(directory) => directory,
            None => Arc::new(UserDirectory::with_demo_users()?),
        };

        Ok(AppState {
            config: Arc::new(config),
            tokens,
            store,
            enforcer,
            directory,
        })
    }
}

impl Default for AppStateBuilder {
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
    use warden_core::MemoryAdapter;

    fn test_config() -> ApiConfig {
        ApiConfig::default().with_jwt(JwtConfig::new(
            "test-secret-key-that-is-long-enough-for-testing",
        ))
    }

    #[tokio::test]
    async fn test_builder_fills_defaults() {
        let store = Arc::new(
            PolicyStore::load(Arc::new(MemoryAdapter::new()))
                .await
                .unwrap(),
        );

        let state = AppState::builder()
            .config(test_config())
            .store(store)
            .build()
            .unwrap();

        assert_eq!(state.directory().len(), 3);
        assert!(!state.enforcer().enforce("nobody", "/anything", "get"));
    }

    #[tokio::test]
    async fn test_builder_requires_store() {
        let result = AppState::builder().config(test_config()).build();
        assert!(result.is_err());
    }
}
