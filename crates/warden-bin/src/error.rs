// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Binary-level error types.

use thiserror::Error;

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors surfaced to the operator by the warden binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
    },

    /// Policy engine failure (malformed model is fatal at startup).
    #[error(transparent)]
    Policy(#[from] warden_core::PolicyError),

    /// API server failure.
    #[error(transparent)]
    Api(#[from] warden_api::ApiError),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
