// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! Subcommands:
//!
//! - `run`: start the gateway (default)
//! - `validate`: validate configuration and policy file
//! - `version`: show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Warden - RBAC authorization gateway
///
/// Authenticates users via signed tokens and authorizes every request
/// against a role-based access-control policy before it reaches
/// application logic.
#[derive(Parser, Debug)]
#[command(
    name = "warden",
    version = warden_api::VERSION,
    about = "RBAC authorization gateway",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "warden.yaml",
        env = "WARDEN_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "WARDEN_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "WARDEN_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// JWT signing secret (overrides the configuration file)
    #[arg(long, env = "WARDEN_JWT_SECRET", hide_env_values = true, global = true)]
    pub jwt_secret: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the warden CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the gateway server
    ///
    /// This is the default command when no subcommand is specified.
    Run(RunArgs),

    /// Validate the configuration and policy file
    ///
    /// Parses the configuration and loads the policy file without starting
    /// the server. Useful for checking a deployment before rollout.
    Validate,

    /// Show version information
    Version,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Override the listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Leave the rule mutation endpoints ungated (bootstrap/demo only)
    #[arg(long)]
    pub open_admin: bool,
}

// =============================================================================
// LogFormat
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text (default).
    Text,
    /// JSON lines, for log aggregation.
    Json,
    /// Compact single-line text.
    Compact,
}

// =============================================================================
// Tests
// =============================================================================
