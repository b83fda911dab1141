// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! JWT issuance and verification.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::Claims;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// JwtConfig
// =============================================================================

/// JWT configuration.
///
/// The secret is injected configuration; an empty secret is a startup error,
/// never a silently compiled-in default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Token lifetime in seconds.
    pub expiry_secs: i64,
    /// Signing algorithm (HMAC family).
    #[serde(with = "algorithm_serde")]
    pub algorithm: Algorithm,
    /// Whether to validate the issuer claim.
    pub validate_issuer: bool,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the operator
            issuer: "warden".to_string(),
            expiry_secs: 3600, // 1 hour
            algorithm: Algorithm::HS256,
            validate_issuer: true,
            leeway_secs: 60,
        }
    }
}

impl JwtConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the token lifetime in seconds.
    pub fn with_expiry_secs(mut self, secs: i64) -> Self {
        self.expiry_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("JWT secret is not configured"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

// =============================================================================
// TokenService
// =============================================================================

/// Issues and verifies signed access tokens.
///
/// Verification is a pure function of (token, clock, secret): no side
/// effects, no lookups.
#[derive(Clone)]
pub struct TokenService {
    config: Arc<JwtConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenService {
    /// Creates a token service from the given configuration.
    pub fn new(config: JwtConfig) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.leeway = config.leeway_secs;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        if config.validate_issuer {
            validation.set_issuer(&[&config.issuer]);
        }

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Issues a token for `subject` with `role`, using the configured
    /// lifetime.
    pub fn issue(&self, subject: &str, role: &str) -> ApiResult<String> {
        self.issue_with_ttl(subject, role, self.config.expiry_secs)
    }

    /// Issues a token with an explicit lifetime in seconds.
    pub fn issue_with_ttl(&self, subject: &str, role: &str, ttl_secs: i64) -> ApiResult<String> {
        let claims = Claims::new(subject, role, ttl_secs).with_issuer(&self.config.issuer);
        let header = Header::new(self.config.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to create token: {}", e)))
    }

    /// Verifies a token and extracts its claims.
    ///
    /// Signature, expiry, and the required `sub`/`role` claims are all
    /// checked; any failure is a 401, with expiry distinguished in the
    /// message.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::unauthorized("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    ApiError::unauthorized("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    ApiError::unauthorized("Invalid token issuer")
                }
                _ => ApiError::unauthorized("Invalid token"),
            })
    }

    /// Returns the configured token lifetime in seconds.
    pub fn expiry_secs(&self) -> i64 {
        self.config.expiry_secs
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.config.issuer)
            .field("algorithm", &self.config.algorithm)
            .field("expiry_secs", &self.config.expiry_secs)
            .finish()
    }
}

// =============================================================================
// Algorithm Serialization
// =============================================================================

mod algorithm_serde {
    use jsonwebtoken::Algorithm;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(algorithm: &Algorithm, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match algorithm {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            other => return Err(serde::ser::Error::custom(format!(
                "unsupported algorithm for secret-based signing: {:?}",
                other
            ))),
        };
        s.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            _ => Err(serde::de::Error::custom(format!(
                "unknown or unsupported algorithm: {}",
                s
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-secret-key-that-is-long-enough-for-testing")
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(test_config()).unwrap();

        let token = service.issue("john", "admin").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "john");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_expired_token() {
        let mut config = test_config();
        config.leeway_secs = 0;
        let service = TokenService::new(config).unwrap();

        let token = service.issue_with_ttl("john", "admin", -3600).unwrap();

        let err = service.verify(&token).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_malformed_token() {
        let service = TokenService::new(test_config()).unwrap();
        assert!(service.verify("not.a.token").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new(JwtConfig::new("secret-one-long-enough-for-tests!!")).unwrap();
        let verifier =
            TokenService::new(JwtConfig::new("secret-two-long-enough-for-tests!!")).unwrap();

        let token = issuer.issue("john", "admin").unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_missing_role_claim_rejected() {
        // Hand-build a token whose payload has no role claim.
        #[derive(serde::Serialize)]
        struct Partial<'a> {
            sub: &'a str,
            exp: i64,
            iat: i64,
            iss: &'a str,
        }

        let config = test_config();
        let service = TokenService::new(config.clone()).unwrap();
        let key = EncodingKey::from_secret(config.secret.as_bytes());
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "john",
                exp: chrono::Utc::now().timestamp() + 3600,
                iat: chrono::Utc::now().timestamp(),
                iss: "warden",
            },
            &key,
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_empty_secret_is_startup_error() {
        let config = JwtConfig::default();
        assert!(TokenService::new(config).is_err());
    }
}
