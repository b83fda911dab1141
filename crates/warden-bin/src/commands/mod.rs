// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Command implementations for the warden CLI.

mod run;
mod validate;
mod version;

pub use run::run;
pub use validate::validate;
pub use version::version;

use std::path::Path;

use warden_api::ApiConfig;

use crate::cli::Cli;
use crate::error::{BinError, BinResult};

/// Loads the configuration file, falling back to defaults when it does not
/// exist, and applies CLI/env overrides.
pub fn load_config(cli: &Cli) -> BinResult<ApiConfig> {
    let mut config = read_config_file(&cli.config)?;

    if let Some(secret) = &cli.jwt_secret {
        config.jwt.secret = secret.clone();
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> BinResult<ApiConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        return Ok(ApiConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| BinError::config(format!("failed to read {}: {}", path.display(), e)))?;

    serde_yaml::from_str(&content)
        .map_err(|e| BinError::config(format!("failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let cli = Cli::parse_from(["warden", "--config", "/nonexistent/warden.yaml"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_config_file_parsed_and_secret_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.yaml");
        std::fs::write(&path, "port: 9191\njwt:\n  secret: from-file\n").unwrap();

        let cli = Cli::parse_from([
            "warden",
            "--config",
            path.to_str().unwrap(),
            "--jwt-secret",
            "from-flag",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.port, 9191);
        assert_eq!(config.jwt.secret, "from-flag");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.yaml");
        std::fs::write(&path, "port: [not a port\n").unwrap();

        let cli = Cli::parse_from(["warden", "--config", path.to_str().unwrap()]);
        assert!(load_config(&cli).is_err());
    }
}
