// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Implementation of the `run` command.

use std::sync::Arc;

use tracing::info;

use warden_api::ApiServerBuilder;
use warden_core::{FileAdapter, PolicyStore};

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::shutdown::ShutdownCoordinator;

/// Executes the `run` command to start the gateway.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    info!("Starting Warden gateway...");

    let mut config = super::load_config(cli)?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.open_admin {
        config.guard_admin_routes = false;
        tracing::warn!("Rule mutation endpoints are ungated (--open-admin)");
    }

    // A malformed policy file fails here, before the server binds.
    let adapter = Arc::new(FileAdapter::open(&config.policy_file)?);
    let store = Arc::new(PolicyStore::load(adapter).await?);

    let server = ApiServerBuilder::new().config(config).store(store).build()?;

    let coordinator = ShutdownCoordinator::new();
    let signal = coordinator.shutdown_signal();
    tokio::spawn(async move { coordinator.wait_for_signals().await });

    server.run_with_shutdown(signal.wait()).await?;

    Ok(())
}
