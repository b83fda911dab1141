// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! In-memory policy adapter.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::PolicyAdapter;
use crate::error::PolicyResult;
use crate::rule::RawRule;

/// In-process adapter that keeps rows in a vector.
///
/// Nothing survives the process; intended for tests and ephemeral setups
/// where durability is not wanted.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    rows: Mutex<Vec<RawRule>>,
}

impl MemoryAdapter {
    /// Creates an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter pre-seeded with rows.
    pub fn with_rows(rows: Vec<RawRule>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Returns `true` if no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl PolicyAdapter for MemoryAdapter {
    async fn load(&self) -> PolicyResult<Vec<RawRule>> {
        Ok(self.rows.lock().clone())
    }

    async fn append(&self, row: &RawRule) -> PolicyResult<()> {
        self.rows.lock().push(row.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_adapter_round_trip() {
        let adapter = MemoryAdapter::new();
        assert!(adapter.is_empty());

        adapter
            .append(&RawRule::policy(1, "admin", "/admin", "get"))
            .await
            .unwrap();

        let rows = adapter.load().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(adapter.len(), 1);
    }
}
