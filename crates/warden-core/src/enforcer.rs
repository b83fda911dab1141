// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! The policy evaluator.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::matcher::{ExactMatcher, ResourceMatcher};
use crate::rule::RuleSet;
use crate::store::PolicyStore;

/// Answers allow/deny for `(role, resource, action)` queries.
///
/// Created once at startup next to the [`PolicyStore`] and shared across all
/// requests; each query runs against one atomic snapshot of the rule set.
#[derive(Clone)]
pub struct Enforcer {
    store: Arc<PolicyStore>,
    matcher: Arc<dyn ResourceMatcher>,
}

impl Enforcer {
    /// Creates an enforcer with the model-default exact resource matcher.
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self::with_matcher(store, Arc::new(ExactMatcher))
    }

    /// Creates an enforcer with a custom resource matcher.
    pub fn with_matcher(store: Arc<PolicyStore>, matcher: Arc<dyn ResourceMatcher>) -> Self {
        Self { store, matcher }
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &Arc<PolicyStore> {
        &self.store
    }

    /// Decides whether `role` may perform `action` on `resource`.
    ///
    /// Absence of a matching allow-rule is an ordinary DENY; this never
    /// fails. The action comparison is case-normalized, the resource
    /// comparison is whatever the configured matcher says.
    pub fn enforce(&self, role: &str, resource: &str, action: &str) -> bool {
        let snapshot = self.store.snapshot();
        let allowed = Self::enforce_snapshot(&snapshot, self.matcher.as_ref(), role, resource, action);

        tracing::debug!(
            role = role,
            resource = resource,
            action = action,
            allowed,
            "Authorization decision"
        );

        allowed
    }

    /// Evaluates against a pinned snapshot.
    ///
    /// Step 1 computes the transitive role closure over the assignment
    /// relation (breadth-first, visited set, so cycles and diamond-shaped
    /// hierarchies terminate without blow-up); step 2 scans policy rules for
    /// every role in the closure.
    pub fn enforce_snapshot(
        snapshot: &RuleSet,
        matcher: &dyn ResourceMatcher,
        role: &str,
        resource: &str,
        action: &str,
    ) -> bool {
        if role.is_empty() || action.is_empty() {
            return false;
        }
        let action = action.to_lowercase();

        let closure = Self::role_closure(snapshot, role);

        snapshot.policies().iter().any(|rule| {
            closure.contains(rule.role.as_str())
                && rule.action == action
                && matcher.matches(&rule.resource, resource)
        })
    }

    /// All roles reachable from `start` via assignment edges, including
    /// `start` itself.
    fn role_closure<'a>(snapshot: &'a RuleSet, start: &'a str) -> HashSet<&'a str> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for edge in snapshot.assignments() {
                if edge.subject == current && visited.insert(edge.role.as_str()) {
                    queue.push_back(edge.role.as_str());
                }
            }
        }

        visited
    }
}

impl std::fmt::Debug for Enforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enforcer")
            .field("matcher", &self.matcher.name())
            .field("rules", &self.store.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemoryAdapter;
    use crate::matcher::PrefixMatcher;

    async fn enforcer() -> Enforcer {
        let store = PolicyStore::load(Arc::new(MemoryAdapter::new()))
            .await
            .unwrap();
        Enforcer::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_no_rules_denies_everything() {
        let e = enforcer().await;
        assert!(!e.enforce("admin", "/admin", "get"));
        assert!(!e.enforce("", "/admin", "get"));
    }

    #[tokio::test]
    async fn test_direct_rule_allows() {
        let e = enforcer().await;
        e.store().add_policy("admin", "/admin", "get").await.unwrap();

        assert!(e.enforce("admin", "/admin", "get"));
        assert!(!e.enforce("admin", "/admin", "post"));
        assert!(!e.enforce("admin", "/other", "get"));
        assert!(!e.enforce("user", "/admin", "get"));
    }

    #[tokio::test]
    async fn test_action_is_case_insensitive() {
        let e = enforcer().await;
        e.store().add_policy("admin", "/admin", "get").await.unwrap();

        assert!(e.enforce("admin", "/admin", "GET"));
        assert!(e.enforce("admin", "/admin", "Get"));
    }

    #[tokio::test]
    async fn test_resource_match_is_exact_by_default() {
        let e = enforcer().await;
        e.store().add_policy("admin", "/admin", "get").await.unwrap();

        assert!(!e.enforce("admin", "/admin/", "get"));
        assert!(!e.enforce("admin", "/Admin", "get"));
    }

    #[tokio::test]
    async fn test_transitive_inheritance() {
        let e = enforcer().await;
        e.store().add_role_for_subject("admin", "super").await.unwrap();
        e.store().add_policy("super", "/x", "get").await.unwrap();

        assert!(e.enforce("admin", "/x", "get"));
        // Inheritance is directed: super does not gain admin's grants.
        e.store().add_policy("admin", "/y", "get").await.unwrap();
        assert!(!e.enforce("super", "/y", "get"));
    }

    #[tokio::test]
    async fn test_deep_chain_inheritance() {
        let e = enforcer().await;
        e.store().add_role_for_subject("a", "b").await.unwrap();
        e.store().add_role_for_subject("b", "c").await.unwrap();
        e.store().add_role_for_subject("c", "d").await.unwrap();
        e.store().add_policy("d", "/deep", "get").await.unwrap();

        assert!(e.enforce("a", "/deep", "get"));
        assert!(!e.enforce("d", "/missing", "get"));
    }

    #[tokio::test]
    async fn test_cyclic_inheritance_terminates() {
        let e = enforcer().await;
        e.store().add_role_for_subject("a", "b").await.unwrap();
        e.store().add_role_for_subject("b", "a").await.unwrap();
        e.store().add_policy("b", "/shared", "get").await.unwrap();

        // Must terminate, and still honor whatever rules exist in the cycle.
        assert!(e.enforce("a", "/shared", "get"));
        assert!(e.enforce("b", "/shared", "get"));
        assert!(!e.enforce("a", "/other", "get"));
    }

    #[tokio::test]
    async fn test_diamond_hierarchy() {
        let e = enforcer().await;
        e.store().add_role_for_subject("lead", "dev").await.unwrap();
        e.store().add_role_for_subject("lead", "ops").await.unwrap();
        e.store().add_role_for_subject("dev", "staff").await.unwrap();
        e.store().add_role_for_subject("ops", "staff").await.unwrap();
        e.store().add_policy("staff", "/wiki", "get").await.unwrap();

        assert!(e.enforce("lead", "/wiki", "get"));
    }

    #[tokio::test]
    async fn test_write_then_read_consistency() {
        let e = enforcer().await;
        for i in 0..20 {
            let resource = format!("/r{}", i);
            e.store().add_policy("admin", &resource, "get").await.unwrap();
            assert!(e.enforce("admin", &resource, "get"));
        }
    }

    #[tokio::test]
    async fn test_prefix_matcher_patterns() {
        let store = PolicyStore::load(Arc::new(MemoryAdapter::new()))
            .await
            .unwrap();
        let e = Enforcer::with_matcher(Arc::new(store), Arc::new(PrefixMatcher));

        e.store()
            .add_policy("reader", "/articles/*", "get")
            .await
            .unwrap();

        assert!(e.enforce("reader", "/articles/42", "get"));
        assert!(!e.enforce("reader", "/articles", "get"));
        assert!(!e.enforce("reader", "/articles/42", "post"));
    }
}
