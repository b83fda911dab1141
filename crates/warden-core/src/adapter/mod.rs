// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Persistence adapters for the policy store.
//!
//! An adapter is the durable side of the store: rows are appended through it
//! before they become visible to evaluation (write-through), and the full set
//! is read back through it at startup or on reload.
//!
//! - [`FileAdapter`]: JSON-lines file, the default backend
//! - [`MemoryAdapter`]: in-process vector, for tests and ephemeral setups
//!
//! # Implementing a Custom Adapter
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use warden_core::{PolicyAdapter, PolicyResult, RawRule};
//!
//! struct SqlAdapter { /* pool */ }
//!
//! #[async_trait]
//! impl PolicyAdapter for SqlAdapter {
//!     async fn load(&self) -> PolicyResult<Vec<RawRule>> { /* SELECT */ Ok(vec![]) }
//!     async fn append(&self, row: &RawRule) -> PolicyResult<()> { /* INSERT */ Ok(()) }
//! }
//! ```

mod file;
mod memory;

pub use file::FileAdapter;
pub use memory::MemoryAdapter;

use async_trait::async_trait;

use crate::error::PolicyResult;
use crate::rule::RawRule;

/// Durable backend for rule rows.
#[async_trait]
pub trait PolicyAdapter: Send + Sync {
    /// Reads every persisted row, in insertion order.
    ///
    /// A missing backing store is an empty set; a corrupt one is
    /// [`PolicyError::Model`](crate::PolicyError::Model).
    async fn load(&self) -> PolicyResult<Vec<RawRule>>;

    /// Durably appends one row.
    ///
    /// The row must be fully persisted (all columns or none) before this
    /// returns; the store publishes to readers only after a successful
    /// append.
    async fn append(&self, row: &RawRule) -> PolicyResult<()>;

    /// Returns `true` if the backend is currently usable.
    async fn health_check(&self) -> bool {
        true
    }

    /// Adapter name, for logging.
    fn name(&self) -> &'static str {
        "adapter"
    }
}
