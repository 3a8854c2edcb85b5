//! Key-value text store boundary.
//!
//! The document cache depends only on this capability set. Index-based key
//! enumeration (`count` + `key_at`) mirrors the browser storage areas the
//! cache was first written against; callers that mutate while enumerating
//! must snapshot the keys first (see [`TextStore::keys`]).

pub mod lmdb;
pub mod memory;

pub use lmdb::{LmdbTextStore, MAX_MAP_SIZE_MB};
pub use memory::InMemoryTextStore;

use feedscope_core::StoreError;
use std::sync::Arc;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent key-value store holding text values.
///
/// Implementations serialize their own operations and must be safe to share
/// across threads.
pub trait TextStore: Send + Sync {
    /// Read the text stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `text` under `key`, replacing any previous value.
    fn set(&self, key: &str, text: &str) -> StoreResult<()>;

    /// Remove `key`. Returns whether a value was present.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Key at position `index` in the store's enumeration order.
    fn key_at(&self, index: usize) -> StoreResult<Option<String>>;

    /// Number of keys currently stored.
    fn count(&self) -> StoreResult<usize>;

    /// Snapshot every key.
    ///
    /// Taken before any deletion so index-based enumeration does not skip
    /// entries.
    fn keys(&self) -> StoreResult<Vec<String>> {
        let count = self.count()?;
        let mut keys = Vec::with_capacity(count);
        for index in 0..count {
            if let Some(key) = self.key_at(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

impl<T: TextStore + ?Sized> TextStore for Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, text: &str) -> StoreResult<()> {
        (**self).set(key, text)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key)
    }

    fn key_at(&self, index: usize) -> StoreResult<Option<String>> {
        (**self).key_at(index)
    }

    fn count(&self) -> StoreResult<usize> {
        (**self).count()
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}
