// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in an access token.
///
/// `sub` and `role` are required: a token missing either fails verification
/// rather than authenticating as nobody-in-particular.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the authenticated user.
    pub sub: String,

    /// Role granted to the subject.
    pub role: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// JWT ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Creates claims for a subject with the given role and lifetime.
    pub fn new(subject: impl Into<String>, role: impl Into<String>, expires_in_secs: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: subject.into(),
            role: role.into(),
            exp: now + expires_in_secs,
            iat: now,
            iss: None,
            jti: Some(Uuid::now_v7().to_string()),
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Returns the subject.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns the role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("john", "admin", 3600);

        assert_eq!(claims.subject(), "john");
        assert_eq!(claims.role(), "admin");
        assert!(!claims.is_expired());
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_claims_expiration() {
        let expired = Claims::new("john", "admin", -100);
        assert!(expired.is_expired());

        let live = Claims::new("john", "admin", 3600);
        assert!(live.expires_at().unwrap() > Utc::now());
    }

    #[test]
    fn test_role_claim_is_required_on_decode() {
        // A payload without a role must not deserialize into Claims.
        let json = r#"{"sub":"john","exp":9999999999,"iat":0}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }
}
