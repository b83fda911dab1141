// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Credential directory backing the token endpoint.
//!
//! The directory is the identity-store boundary: `/token` verifies
//! credentials here and nowhere else. The in-memory implementation exists so
//! the gateway is usable standalone; a deployment wanting a real user store
//! swaps the directory wholesale.

use std::collections::HashMap;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use parking_lot::RwLock;
use rand_core::OsRng;

use crate::error::{ApiError, ApiResult};

/// A stored user record.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Username.
    pub username: String,
    /// Argon2 password hash in PHC string format.
    pub password_hash: String,
    /// Role granted at login.
    pub role: String,
}

/// In-memory credential store with argon2-hashed passwords.
pub struct UserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a directory seeded with the demo users.
    ///
    /// All three share the password `password`: john (admin),
    /// krunal (subadmin), dev (user).
    pub fn with_demo_users() -> ApiResult<Self> {
        let directory = Self::new();
        directory.insert("john", "password", "admin")?;
        directory.insert("krunal", "password", "subadmin")?;
        directory.insert("dev", "password", "user")?;
        Ok(directory)
    }

    /// Adds a user, hashing the password.
    pub fn insert(&self, username: &str, password: &str, role: &str) -> ApiResult<()> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?
            .to_string();

        self.users.write().insert(
            username.to_string(),
            UserRecord {
                username: username.to_string(),
                password_hash: hash,
                role: role.to_string(),
            },
        );

        Ok(())
    }

    /// Verifies credentials and returns the matching record.
    ///
    /// Unknown subject and wrong password produce the same 401; the
    /// distinction stays in the logs, never in the response.
    pub fn verify(&self, username: &str, password: &str) -> ApiResult<UserRecord> {
        let record = {
            let users = self.users.read();
            users.get(username).cloned()
        };

        let Some(record) = record else {
            tracing::debug!(username, "Login attempt for unknown user");
            return Err(ApiError::unauthorized("Incorrect username or password"));
        };

        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|e| ApiError::internal(format!("Corrupt password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| {
                tracing::debug!(username, "Login attempt with wrong password");
                ApiError::unauthorized("Incorrect username or password")
            })?;

        Ok(record)
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if the directory holds no users.
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("users", &self.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_demo_users() {
        let directory = UserDirectory::with_demo_users().unwrap();

        let record = directory.verify("john", "password").unwrap();
        assert_eq!(record.role, "admin");

        let record = directory.verify("dev", "password").unwrap();
        assert_eq!(record.role, "user");
    }

    #[test]
    fn test_wrong_password_rejected() {
        let directory = UserDirectory::with_demo_users().unwrap();
        assert!(directory.verify("john", "wrong").is_err());
    }

    #[test]
    fn test_unknown_user_same_error_shape() {
        let directory = UserDirectory::with_demo_users().unwrap();

        let unknown = directory.verify("ghost", "password").unwrap_err();
        let wrong = directory.verify("john", "wrong").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_password_not_stored_in_plaintext() {
        let directory = UserDirectory::new();
        directory.insert("alice", "hunter2", "user").unwrap();

        let users = directory.users.read();
        let record = users.get("alice").unwrap();
        assert!(!record.password_hash.contains("hunter2"));
        assert!(record.password_hash.starts_with("$argon2"));
    }
}
