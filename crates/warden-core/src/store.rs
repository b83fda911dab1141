// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! The shared policy store.
//!
//! One `PolicyStore` is created at process start and shared behind an `Arc`
//! for the process lifetime; handlers and the enforcement gate never
//! reconnect to the backing store per request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::adapter::PolicyAdapter;
use crate::error::PolicyResult;
use crate::rule::{RawRule, RuleSet};

/// Shared rule set with write-through persistence.
///
/// Reads clone an `Arc<RuleSet>` snapshot: an evaluation in flight keeps
/// seeing the set it started with, and no reader can observe a rule with
/// some but not all fields applied. Writes serialize on an async mutex
/// around the persist-then-publish sequence, so a row is durable in the
/// adapter before any reader can match it.
pub struct PolicyStore {
    adapter: Arc<dyn PolicyAdapter>,
    snapshot: RwLock<Arc<RuleSet>>,
    write_gate: tokio::sync::Mutex<()>,
    next_id: AtomicU64,
}

impl PolicyStore {
    /// Bulk-loads the rule set from the adapter.
    ///
    /// A corrupt backing store surfaces as [`PolicyError::Model`]
    /// (fail-fast at startup, not per request).
    ///
    /// [`PolicyError::Model`]: crate::PolicyError::Model
    pub async fn load(adapter: Arc<dyn PolicyAdapter>) -> PolicyResult<Self> {
        let rows = adapter.load().await?;
        let set = RuleSet::from_raw(rows);
        let next_id = set.max_id() + 1;

        tracing::info!(
            adapter = adapter.name(),
            rules = set.len(),
            "Policy store loaded"
        );

        Ok(Self {
            adapter,
            snapshot: RwLock::new(Arc::new(set)),
            write_gate: tokio::sync::Mutex::new(()),
            next_id: AtomicU64::new(next_id),
        })
    }

    /// Returns the current immutable rule-set snapshot.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.snapshot.read().clone()
    }

    /// Number of stored rule rows.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns `true` if no rules are stored.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Appends a policy rule `(role, resource, action)`.
    ///
    /// Duplicates are allowed; an identical allow-rule is idempotent.
    pub async fn add_policy(
        &self,
        role: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> PolicyResult<RawRule> {
        let _gate = self.write_gate.lock().await;
        let row = RawRule::policy(self.take_id(), role, resource, action);
        self.persist_then_publish(row).await
    }

    /// Appends a role-assignment rule `(subject, role)`.
    ///
    /// When `subject` names a role, this grants inheritance.
    pub async fn add_role_for_subject(
        &self,
        subject: impl Into<String>,
        role: impl Into<String>,
    ) -> PolicyResult<RawRule> {
        let _gate = self.write_gate.lock().await;
        let row = RawRule::assignment(self.take_id(), subject, role);
        self.persist_then_publish(row).await
    }

    /// Appends a raw rule row in the generalized 6-column shape.
    pub async fn add_raw(
        &self,
        ptype: impl Into<String>,
        values: [Option<String>; 6],
    ) -> PolicyResult<RawRule> {
        let _gate = self.write_gate.lock().await;
        let [v0, v1, v2, v3, v4, v5] = values;
        let row = RawRule {
            id: self.take_id(),
            ptype: ptype.into(),
            v0: v0.unwrap_or_default(),
            v1: v1.unwrap_or_default(),
            v2: v2.unwrap_or_default(),
            v3,
            v4,
            v5,
        };
        self.persist_then_publish(row).await
    }

    /// Returns a page of raw rows in insertion order.
    ///
    /// An out-of-range `offset` yields an empty page.
    pub fn list_rules(&self, offset: usize, limit: usize) -> Vec<RawRule> {
        self.snapshot().page(offset, limit)
    }

    /// Re-reads the adapter and replaces the published snapshot.
    pub async fn reload(&self) -> PolicyResult<()> {
        let _gate = self.write_gate.lock().await;
        let rows = self.adapter.load().await?;
        let set = RuleSet::from_raw(rows);
        self.next_id.store(set.max_id() + 1, Ordering::SeqCst);

        tracing::info!(rules = set.len(), "Policy store reloaded");

        *self.snapshot.write() = Arc::new(set);
        Ok(())
    }

    /// Returns `true` if the backing adapter is usable.
    pub async fn health_check(&self) -> bool {
        self.adapter.health_check().await
    }

    /// Adapter name, for logging and health reporting.
    pub fn adapter_name(&self) -> &'static str {
        self.adapter.name()
    }

    fn take_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Durably appends the row, then publishes a new snapshot containing it.
    ///
    /// Caller holds `write_gate`. On adapter failure nothing is published and
    /// readers keep the previous consistent set.
    async fn persist_then_publish(&self, row: RawRule) -> PolicyResult<RawRule> {
        self.adapter.append(&row).await?;

        let mut guard = self.snapshot.write();
        let mut set = RuleSet::clone(guard.as_ref());
        set.push(row.clone());
        *guard = Arc::new(set);
        drop(guard);

        tracing::debug!(
            id = row.id,
            ptype = %row.ptype,
            v0 = %row.v0,
            v1 = %row.v1,
            "Rule added"
        );

        Ok(row)
    }
}

impl std::fmt::Debug for PolicyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyStore")
            .field("adapter", &self.adapter.name())
            .field("rules", &self.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{FileAdapter, MemoryAdapter};
    use tempfile::tempdir;

    async fn memory_store() -> PolicyStore {
        PolicyStore::load(Arc::new(MemoryAdapter::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_is_write_through() {
        let adapter = Arc::new(MemoryAdapter::new());
        let store = PolicyStore::load(adapter.clone()).await.unwrap();

        store.add_policy("admin", "/admin", "GET").await.unwrap();

        // Durable before visible: the adapter saw the row too.
        assert_eq!(adapter.len(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot().policies()[0].action, "get");
    }

    #[tokio::test]
    async fn test_ids_are_sequential_insertion_order() {
        let store = memory_store().await;

        for i in 0..5 {
            store
                .add_policy("admin", format!("/r{}", i), "get")
                .await
                .unwrap();
        }

        let rows = store.list_rules(0, 100);
        let ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_pagination() {
        let store = memory_store().await;
        for i in 1..=15 {
            store
                .add_policy("admin", format!("/r{}", i), "get")
                .await
                .unwrap();
        }

        let first = store.list_rules(0, 10);
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].v1, "/r1");

        let rest = store.list_rules(10, 10);
        assert_eq!(rest.len(), 5);

        assert!(store.list_rules(15, 10).is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_is_stable_across_writes() {
        let store = memory_store().await;
        store.add_policy("admin", "/a", "get").await.unwrap();

        let snap = store.snapshot();
        store.add_policy("admin", "/b", "get").await.unwrap();

        // The pinned snapshot does not grow; a fresh one does.
        assert_eq!(snap.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.jsonl");

        let adapter = Arc::new(FileAdapter::open(&path).unwrap());
        let store = PolicyStore::load(adapter).await.unwrap();
        store.add_policy("admin", "/admin", "get").await.unwrap();

        // A second handle to the same file, as an external writer would be.
        let writer = FileAdapter::open(&path).unwrap();
        writer
            .append(&RawRule::assignment(99, "john", "admin"))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        store.reload().await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot().assignments()[0].subject, "john");

        // Ids keep climbing past the reloaded maximum.
        let row = store.add_policy("admin", "/x", "get").await.unwrap();
        assert_eq!(row.id, 100);
    }

    #[tokio::test]
    async fn test_add_raw_row() {
        let store = memory_store().await;

        let row = store
            .add_raw(
                "p",
                [
                    Some("editor".to_string()),
                    Some("/articles".to_string()),
                    Some("post".to_string()),
                    None,
                    None,
                    None,
                ],
            )
            .await
            .unwrap();

        assert_eq!(row.id, 1);
        assert_eq!(store.snapshot().policies().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_rules_are_harmless() {
        let store = memory_store().await;
        store.add_policy("admin", "/admin", "get").await.unwrap();
        store.add_policy("admin", "/admin", "get").await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot().policies().len(), 2);
    }
}
