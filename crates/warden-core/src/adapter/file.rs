// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! File-backed policy adapter.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::PolicyAdapter;
use crate::error::{PolicyError, PolicyResult};
use crate::rule::RawRule;

/// JSON-lines file adapter.
///
/// Each rule row is one JSON object per line, appended in insertion order.
/// Appends are flushed before returning so a row the store has published is
/// always on disk; a crash mid-append leaves at worst one truncated trailing
/// line, which [`load`](PolicyAdapter::load) rejects rather than guesses at.
///
/// # Example
///
/// ```rust,ignore
/// use warden_core::{FileAdapter, PolicyStore};
/// use std::sync::Arc;
///
/// let adapter = Arc::new(FileAdapter::open("policy.jsonl")?);
/// let store = PolicyStore::load(adapter).await?;
/// ```
pub struct FileAdapter {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileAdapter {
    /// Opens (or creates) the backing file at `path`.
    pub fn open(path: impl AsRef<Path>) -> PolicyResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                PolicyError::unavailable(format!("failed to open {}: {}", path.display(), e))
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PolicyAdapter for FileAdapter {
    async fn load(&self) -> PolicyResult<Vec<RawRule>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PolicyError::unavailable(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut rows = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row: RawRule = serde_json::from_str(line).map_err(|e| {
                PolicyError::model(format!(
                    "{}:{}: malformed rule row: {}",
                    self.path.display(),
                    lineno + 1,
                    e
                ))
            })?;
            rows.push(row);
        }

        tracing::debug!(path = %self.path.display(), rules = rows.len(), "Loaded policy file");
        Ok(rows)
    }

    async fn append(&self, row: &RawRule) -> PolicyResult<()> {
        let line = serde_json::to_string(row)
            .map_err(|e| PolicyError::model(format!("failed to encode rule row: {}", e)))?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)
            .map_err(|e| PolicyError::unavailable(format!("append failed: {}", e)))?;
        writer
            .flush()
            .map_err(|e| PolicyError::unavailable(format!("flush failed: {}", e)))?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.writer.lock().flush().is_ok()
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

impl std::fmt::Debug for FileAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAdapter").field("path", &self.path).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_append_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.jsonl");

        let adapter = FileAdapter::open(&path).unwrap();
        adapter
            .append(&RawRule::policy(1, "admin", "/admin", "get"))
            .await
            .unwrap();
        adapter
            .append(&RawRule::assignment(2, "john", "admin"))
            .await
            .unwrap();

        let rows = adapter.load().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ptype, "p");
        assert_eq!(rows[1].ptype, "g");
        assert_eq!(rows[1].v0, "john");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("policy.jsonl");

        let adapter = FileAdapter::open(&path).unwrap();
        // The file exists now but is empty.
        let rows = adapter.load().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.jsonl");
        fs::write(&path, "{\"id\":1,\"ptype\":\"p\"\nnot json\n").unwrap();

        let adapter = FileAdapter::open(&path).unwrap();
        let err = adapter.load().await.unwrap_err();
        assert!(matches!(err, PolicyError::Model { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_append_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.jsonl");

        {
            let adapter = FileAdapter::open(&path).unwrap();
            adapter
                .append(&RawRule::policy(1, "user", "/articles", "get"))
                .await
                .unwrap();
        }

        let adapter = FileAdapter::open(&path).unwrap();
        let rows = adapter.load().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].v1, "/articles");
        assert!(adapter.health_check().await);
    }
}
