//! LMDB-backed persistent text store.
//!
//! Uses the heed crate (Rust bindings for LMDB) so cached feed documents
//! survive process restarts. Keys and values are UTF-8 strings in a single
//! unnamed database; enumeration order is LMDB's byte order.
//!
//! # Thread Safety
//!
//! LMDB provides ACID transactions. The store uses:
//! - Read transactions for `get`, `key_at` and `count`
//! - Write transactions for `set` and `delete`

use std::path::Path;

use feedscope_core::StoreError;
use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};

use super::{StoreResult, TextStore};

/// Largest accepted map size (1 TiB).
pub const MAX_MAP_SIZE_MB: usize = 1 << 20;

/// Persistent text store on an LMDB environment.
///
/// # Example
///
/// ```ignore
/// use feedscope_storage::{LmdbTextStore, TextStore};
///
/// let store = LmdbTextStore::new("/var/cache/feedscope", 256)?;
/// store.set("feedscope:gbfs-cache:https://example.com/gbfs.json", "{...}")?;
/// ```
pub struct LmdbTextStore {
    env: Env,
    db: Database<Str, Str>,
    map_size: usize,
}

impl LmdbTextStore {
    /// Open (or create) a store.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes, at most
    ///   [`MAX_MAP_SIZE_MB`]; writes beyond it fail with
    ///   [`StoreError::QuotaExceeded`]
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> StoreResult<Self> {
        let map_size = map_size_bytes(max_size_mb)?;
        std::fs::create_dir_all(&path).map_err(|e| StoreError::Unavailable {
            reason: format!("cannot create {}: {}", path.as_ref().display(), e),
        })?;

        // SAFETY: the environment is opened once per directory by this
        // process and never memory-mapped elsewhere.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| StoreError::Unavailable {
            reason: e.to_string(),
        })?;

        let mut wtxn = env.write_txn().map_err(backend)?;
        let db: Database<Str, Str> = env.create_database(&mut wtxn, None).map_err(backend)?;
        wtxn.commit().map_err(backend)?;

        Ok(Self { env, db, map_size })
    }

    /// Configured map size in bytes.
    pub fn map_size(&self) -> usize {
        self.map_size
    }

    fn write_error(&self, key: &str, text_len: usize, e: heed::Error) -> StoreError {
        match e {
            heed::Error::Mdb(heed::MdbError::MapFull) => StoreError::QuotaExceeded {
                key: key.to_string(),
                needed: key.len() + text_len,
                limit: self.map_size,
            },
            other => backend(other),
        }
    }
}

fn map_size_bytes(max_size_mb: usize) -> StoreResult<usize> {
    if max_size_mb == 0 || max_size_mb > MAX_MAP_SIZE_MB {
        return Err(StoreError::Unavailable {
            reason: format!(
                "map size of {} MB is outside 1..={} MB",
                max_size_mb, MAX_MAP_SIZE_MB
            ),
        });
    }
    max_size_mb
        .checked_mul(1024 * 1024)
        .ok_or_else(|| StoreError::Unavailable {
            reason: format!("map size of {} MB overflows", max_size_mb),
        })
}

fn backend(e: heed::Error) -> StoreError {
    StoreError::Backend {
        reason: e.to_string(),
    }
}

impl TextStore for LmdbTextStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let value = self.db.get(&rtxn, key).map_err(backend)?;
        Ok(value.map(str::to_string))
    }

    fn set(&self, key: &str, text: &str) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        self.db
            .put(&mut wtxn, key, text)
            .map_err(|e| self.write_error(key, text.len(), e))?;
        wtxn.commit().map_err(|e| self.write_error(key, text.len(), e))
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let deleted = self.db.delete(&mut wtxn, key).map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(deleted)
    }

    fn key_at(&self, index: usize) -> StoreResult<Option<String>> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let mut iter = self.db.iter(&rtxn).map_err(backend)?;
        match iter.nth(index) {
            Some(Ok((key, _))) => Ok(Some(key.to_string())),
            Some(Err(e)) => Err(backend(e)),
            None => Ok(None),
        }
    }

    fn count(&self) -> StoreResult<usize> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let len = self.db.len(&rtxn).map_err(backend)?;
        Ok(len as usize)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let iter = self.db.iter(&rtxn).map_err(backend)?;
        let mut keys = Vec::new();
        for result in iter {
            let (key, _) = result.map_err(backend)?;
            keys.push(key.to_string());
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (LmdbTextStore, TempDir) {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        let store = LmdbTextStore::new(temp_dir.path(), 10).expect("store creation should succeed");
        (store, temp_dir)
    }

    #[test]
    fn test_put_and_get() {
        let (store, _temp_dir) = create_test_store();
        store.set("k", "{\"data\":1,\"ts\":0}").expect("set should succeed");
        assert_eq!(
            store.get("k").expect("get should succeed"),
            Some("{\"data\":1,\"ts\":0}".to_string())
        );
        assert_eq!(store.get("missing").expect("get should succeed"), None);
    }

    #[test]
    fn test_overwrite() {
        let (store, _temp_dir) = create_test_store();
        store.set("k", "old").expect("set should succeed");
        store.set("k", "new").expect("set should succeed");
        assert_eq!(store.get("k").expect("get should succeed"), Some("new".to_string()));
        assert_eq!(store.count().expect("count should succeed"), 1);
    }

    #[test]
    fn test_delete() {
        let (store, _temp_dir) = create_test_store();
        store.set("k", "v").expect("set should succeed");
        assert!(store.delete("k").expect("delete should succeed"));
        assert!(!store.delete("k").expect("delete should succeed"));
        assert_eq!(store.get("k").expect("get should succeed"), None);
    }

    #[test]
    fn test_key_enumeration_is_byte_ordered() {
        let (store, _temp_dir) = create_test_store();
        for key in ["c", "a", "b"] {
            store.set(key, "v").expect("set should succeed");
        }
        assert_eq!(store.count().expect("count should succeed"), 3);
        assert_eq!(store.key_at(0).expect("key_at should succeed"), Some("a".to_string()));
        assert_eq!(store.key_at(3).expect("key_at should succeed"), None);
        assert_eq!(store.keys().expect("keys should succeed"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_oversized_map_is_rejected_without_panicking() {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        for max_size_mb in [0, MAX_MAP_SIZE_MB + 1, usize::MAX / 1024] {
            assert!(matches!(
                LmdbTextStore::new(temp_dir.path(), max_size_mb),
                Err(StoreError::Unavailable { .. })
            ));
        }
    }

    #[test]
    fn test_full_map_reports_configured_limit() {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        let store = LmdbTextStore::new(temp_dir.path(), 1).expect("store creation should succeed");
        assert_eq!(store.map_size(), 1024 * 1024);

        let text = "x".repeat(2 * 1024 * 1024);
        match store.set("big", &text) {
            Err(StoreError::QuotaExceeded { key, limit, .. }) => {
                assert_eq!(key, "big");
                assert_eq!(limit, 1024 * 1024);
            }
            other => panic!("Expected QuotaExceeded, got: {:?}", other),
        }
    }
}
