// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Warden - RBAC authorization gateway
//!
//! Main binary entry point.

mod cli;
mod commands;
mod error;
mod logging;
mod shutdown;

use clap::Parser;

use cli::{Cli, Commands, RunArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level, cli.log_format);

    let command = cli.command.clone().unwrap_or(Commands::Run(RunArgs::default()));

    let result = match command {
        Commands::Run(args) => commands::run(&cli, args).await,
        Commands::Validate => commands::validate(&cli).await,
        Commands::Version => commands::version(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
