// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Per-request identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Claims;

/// Identity bound to a request after token verification.
///
/// Attached to request extensions by the enforcement gate; handlers read it
/// through the [`Auth`](crate::extractors::Auth) extractor. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated subject.
    pub subject: String,
    /// Role carried by the token.
    pub role: String,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl Identity {
    /// Creates an identity from verified claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            subject: claims.sub.clone(),
            role: claims.role.clone(),
            request_id: Uuid::now_v7(),
        }
    }

    /// Creates an anonymous identity for public-path requests.
    pub fn anonymous() -> Self {
        Self {
            subject: "anonymous".to_string(),
            role: String::new(),
            request_id: Uuid::now_v7(),
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if this identity came from a verified token.
    pub fn is_authenticated(&self) -> bool {
        self.subject != "anonymous"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_claims() {
        let claims = Claims::new("john", "admin", 3600);
        let identity = Identity::from_claims(&claims);

        assert_eq!(identity.subject, "john");
        assert_eq!(identity.role, "admin");
        assert!(identity.is_authenticated());
    }

    #[test]
    fn test_anonymous_identity() {
        let identity = Identity::anonymous();
        assert!(!identity.is_authenticated());
        assert!(identity.role.is_empty());
    }
}
