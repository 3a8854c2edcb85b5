//! In-memory text store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use feedscope_core::StoreError;

use super::{StoreResult, TextStore};

/// Text store backed by a sorted map.
///
/// An optional byte quota (keys plus values) makes writes fail the way a
/// full browser storage area does.
#[derive(Debug, Default)]
pub struct InMemoryTextStore {
    entries: RwLock<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once it would hold more than
    /// `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes held, counting keys and values.
    pub fn used_bytes(&self) -> StoreResult<usize> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(used_bytes(&entries))
    }

    pub fn contains_key(&self, key: &str) -> StoreResult<bool> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.contains_key(key))
    }
}

fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl TextStore for InMemoryTextStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, text: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(limit) = self.quota_bytes {
            let replaced = entries.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let needed = used_bytes(&entries) - replaced + key.len() + text.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn key_at(&self, index: usize) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.keys().nth(index).cloned())
    }

    fn count(&self) -> StoreResult<usize> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let store = InMemoryTextStore::new();
        store.set("a", "1").expect("set should succeed");
        assert_eq!(store.get("a").expect("get should succeed"), Some("1".to_string()));
        assert!(store.delete("a").expect("delete should succeed"));
        assert!(!store.delete("a").expect("delete should succeed"));
        assert_eq!(store.get("a").expect("get should succeed"), None);
    }

    #[test]
    fn test_key_enumeration() {
        let store = InMemoryTextStore::new();
        store.set("b", "2").expect("set should succeed");
        store.set("a", "1").expect("set should succeed");
        assert_eq!(store.count().expect("count should succeed"), 2);
        assert_eq!(store.key_at(0).expect("key_at should succeed"), Some("a".to_string()));
        assert_eq!(store.key_at(2).expect("key_at should succeed"), None);
        assert_eq!(store.keys().expect("keys should succeed"), vec!["a", "b"]);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = InMemoryTextStore::with_quota(10);
        store.set("k", "12345").expect("set within quota should succeed");
        let err = store.set("j", "123456789").expect_err("set over quota should fail");
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 10, .. }));
        assert_eq!(store.count().expect("count should succeed"), 1);
    }

    #[test]
    fn test_quota_counts_replacement_once() {
        let store = InMemoryTextStore::with_quota(10);
        store.set("k", "123456789").expect("set should succeed");
        store.set("k", "987654321").expect("overwrite of same size should succeed");
        assert_eq!(store.used_bytes().expect("used_bytes should succeed"), 10);
    }
}
