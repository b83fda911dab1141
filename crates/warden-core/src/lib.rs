// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! # warden-core
//!
//! Authorization decision engine for the Warden gateway.
//!
//! This crate provides the policy model and the evaluation algorithm that
//! decides whether a `(role, resource, action)` triple is permitted:
//!
//! - **Rule**: typed policy and role-assignment rules decoded from the raw
//!   persisted row shape
//! - **Store**: the shared, write-through rule set with snapshot reads
//! - **Enforcer**: role-closure resolution and rule matching
//! - **Adapter**: pluggable persistence backends (file, in-memory)
//! - **Matcher**: pluggable resource matching (exact, prefix)
//!
//! The HTTP surface lives in `warden-api`; this crate knows nothing about
//! transports or tokens.
//!
//! ## Example
//!
//! ```rust,ignore
//! use warden_core::{Enforcer, MemoryAdapter, PolicyStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(PolicyStore::load(Arc::new(MemoryAdapter::new())).await?);
//! store.add_role_for_subject("admin", "super").await?;
//! store.add_policy("super", "/reports", "get").await?;
//!
//! let enforcer = Enforcer::new(store);
//! assert!(enforcer.enforce("admin", "/reports", "GET"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod enforcer;
pub mod error;
pub mod matcher;
pub mod rule;
pub mod store;

pub use adapter::{FileAdapter, MemoryAdapter, PolicyAdapter};
pub use enforcer::Enforcer;
pub use error::{PolicyError, PolicyResult};
pub use matcher::{ExactMatcher, PrefixMatcher, ResourceMatcher};
pub use rule::{PolicyRule, RawRule, Rule, RoleAssignment, RuleSet};
pub use store::PolicyStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
