// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Implementation of the `version` command.

use crate::error::BinResult;

/// Prints version information for all components.
pub fn version() -> BinResult<()> {
    println!("warden      {}", warden_api::VERSION);
    println!("warden-core {}", warden_core::VERSION);
    Ok(())
}
