// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Resource matching strategies.
//!
//! The rule model treats the matching function as configuration, not a
//! hardcoded comparison. `ExactMatcher` is the model default; `PrefixMatcher`
//! additionally understands trailing-`*` patterns for deployments that group
//! routes under a common prefix.

use std::fmt;

/// Decides whether a rule's resource pattern covers a requested resource.
pub trait ResourceMatcher: Send + Sync {
    /// Returns `true` if `pattern` covers `resource`.
    ///
    /// Implementations must treat an empty pattern as matching nothing.
    fn matches(&self, pattern: &str, resource: &str) -> bool;

    /// Matcher name, for logging.
    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn ResourceMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceMatcher({})", self.name())
    }
}

// =============================================================================
// ExactMatcher
// =============================================================================

/// Exact string equality.
///
/// Trailing-slash and case differences are distinct resources; no
/// normalization happens here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl ResourceMatcher for ExactMatcher {
    fn matches(&self, pattern: &str, resource: &str) -> bool {
        !pattern.is_empty() && pattern == resource
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

// =============================================================================
// PrefixMatcher
// =============================================================================

/// Exact equality plus trailing-`*` prefix patterns.
///
/// `"/articles/*"` covers `/articles/42` but not `/articles` itself;
/// patterns without a trailing `*` behave exactly like [`ExactMatcher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixMatcher;

impl ResourceMatcher for PrefixMatcher {
    fn matches(&self, pattern: &str, resource: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }
        if let Some(prefix) = pattern.strip_suffix('*') {
            resource.starts_with(prefix)
        } else {
            pattern == resource
        }
    }

    fn name(&self) -> &'static str {
        "prefix"
    }
}

// =============================================================================
// Tests
// =============================================================================
