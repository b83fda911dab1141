// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Policy engine error types.

use thiserror::Error;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors raised by the policy store and its adapters.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The persisted rule model is unreadable or malformed.
    ///
    /// This is a startup failure: a store refuses to load from a corrupt
    /// backing file rather than serving a partial rule set.
    #[error("Policy model error: {message}")]
    Model {
        /// What was wrong with the model.
        message: String,
    },

    /// The backing store could not be reached during a mutation or reload.
    #[error("Policy store unavailable: {message}")]
    StoreUnavailable {
        /// Failure description.
        message: String,
    },

    /// Underlying I/O failure.
    #[error("Policy store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PolicyError {
    /// Creates a model error.
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Creates a store-unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is fatal at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PolicyError::Model { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_is_fatal() {
        assert!(PolicyError::model("bad row").is_fatal());
        assert!(!PolicyError::unavailable("disk gone").is_fatal());
    }
}
