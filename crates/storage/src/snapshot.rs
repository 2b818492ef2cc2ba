//! JSON snapshots of a `MemoryStore`.
//!
//! A snapshot is the whole keyspace written as one JSON document. The file
//! is written beside its destination and renamed into place, so a crash
//! mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::memory::{Entry, MemoryStore};

const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    format: u32,
    entries: BTreeMap<String, Entry>,
}

/// `path` with `.tmp` appended, so it never names the destination itself.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

impl MemoryStore {
    /// Write every key to `path`. Returns the number of keys written.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let path = path.as_ref();
        let file = SnapshotFile {
            format: SNAPSHOT_FORMAT,
            entries: self.entries_snapshot(),
        };
        let count = file.entries.len();
        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| StoreError::snapshot(format!("encode failed: {}", e)))?;

        let tmp = staging_path(path);
        fs::write(&tmp, json)
            .map_err(|e| StoreError::snapshot(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, path)
            .map_err(|e| StoreError::snapshot(format!("{}: {}", path.display(), e)))?;

        info!(target: "stacks::store", path = %path.display(), keys = count, "Snapshot saved");
        Ok(count)
    }

    /// Build a store from a snapshot written by [`MemoryStore::save_snapshot`].
    pub fn load_snapshot(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| StoreError::snapshot(format!("{}: {}", path.display(), e)))?;
        let file: SnapshotFile = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::snapshot(format!("{}: {}", path.display(), e)))?;
        if file.format != SNAPSHOT_FORMAT {
            return Err(StoreError::snapshot(format!(
                "{}: unsupported snapshot format {}",
                path.display(),
                file.format
            )));
        }

        let store = MemoryStore::from_entries(file.entries);
        info!(target: "stacks::store", path = %path.display(), keys = store.key_count(), "Snapshot loaded");
        Ok(store)
    }
}
