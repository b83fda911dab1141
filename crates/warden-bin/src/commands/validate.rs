// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Implementation of the `validate` command.

use std::sync::Arc;

use warden_core::{FileAdapter, PolicyStore};

use crate::cli::Cli;
use crate::error::{BinError, BinResult};

/// Validates the configuration and policy file without starting the server.
pub async fn validate(cli: &Cli) -> BinResult<()> {
    let config = super::load_config(cli)?;

    if config.jwt.secret.is_empty() {
        return Err(BinError::config(
            "JWT secret is not configured (set jwt.secret or WARDEN_JWT_SECRET)",
        ));
    }

    let adapter = Arc::new(FileAdapter::open(&config.policy_file)?);
    let store = PolicyStore::load(adapter).await?;

    println!("Configuration OK");
    println!("  listen:       {}", config.socket_addr());
    println!("  policy file:  {}", config.policy_file.display());
    println!("  rules loaded: {}", store.len());
    println!(
        "  admin routes: {}",
        if config.guard_admin_routes {
            "gated"
        } else {
            "OPEN (bootstrap mode)"
        }
    );

    Ok(())
}
