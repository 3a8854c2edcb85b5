//! The expiring document cache.

use feedscope_core::{CacheConfig, EpochMillis, JsonValue};

use super::clock::{Clock, SystemClock};
use super::entry::{self, DecodedEntry};
use super::stats::{CacheCounters, CacheStats, SweepReport};
use crate::store::TextStore;

/// URL-keyed document cache with time-based expiry.
///
/// # Type Parameters
///
/// - `S`: The text store holding serialized entries
/// - `C`: The clock used to stamp and age entries
///
/// No operation returns an error or panics on store failure; failures are
/// logged and counted, and lookups degrade to misses.
pub struct ExpiringDocumentCache<S, C = SystemClock>
where
    S: TextStore,
    C: Clock,
{
    store: S,
    clock: C,
    config: CacheConfig,
    counters: CacheCounters,
}

impl<S: TextStore> ExpiringDocumentCache<S, SystemClock> {
    /// Create a cache over `store` using the wall clock.
    pub fn new(store: S, config: CacheConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S, C> ExpiringDocumentCache<S, C>
where
    S: TextStore,
    C: Clock,
{
    pub fn with_clock(store: S, clock: C, config: CacheConfig) -> Self {
        Self {
            store,
            clock,
            config,
            counters: CacheCounters::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    fn ttl_ms(&self) -> i64 {
        i64::try_from(self.config.ttl_ms).unwrap_or(i64::MAX)
    }

    fn is_fresh(&self, entry: &entry::CacheEntry, now: EpochMillis) -> bool {
        entry.is_fresh(now, self.ttl_ms())
    }

    /// Look up the cached document for `url`.
    ///
    /// Expired entries and entries with an unusable timestamp are removed.
    /// Text that is not an entry is left for [`Self::sweep`].
    pub fn get(&self, url: &str) -> Option<JsonValue> {
        let key = self.config.key_for(url);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.counters.miss();
                return None;
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache read failed, treating as miss");
                self.counters.store_failure();
                self.counters.miss();
                return None;
            }
        };

        let now = self.clock.now_millis();
        match entry::decode(&raw) {
            DecodedEntry::Valid(entry) if self.is_fresh(&entry, now) => {
                tracing::debug!(key = %key, age_ms = now - entry.ts, "Cache hit");
                self.counters.hit();
                Some(entry.data)
            }
            DecodedEntry::Valid(_) | DecodedEntry::InvalidTimestamp => {
                self.evict(&key);
                self.counters.miss();
                None
            }
            DecodedEntry::Corrupted => {
                tracing::debug!(key = %key, "Corrupted cache entry left for sweep");
                self.counters.miss();
                None
            }
        }
    }

    /// Store `data` for `url`, replacing any previous entry.
    ///
    /// A failed write is logged and otherwise ignored.
    pub fn set(&self, url: &str, data: &JsonValue) {
        let key = self.config.key_for(url);
        let text = match entry::encode(data, self.clock.now_millis()) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to encode cache entry");
                return;
            }
        };
        match self.store.set(&key, &text) {
            Ok(()) => self.counters.write(),
            Err(err) => {
                tracing::warn!(key = %key, bytes = text.len(), error = %err, "Cache write failed");
                self.counters.store_failure();
            }
        }
    }

    /// Remove the entry for `url` regardless of its state.
    pub fn invalidate(&self, url: &str) {
        let key = self.config.key_for(url);
        self.evict(&key);
    }

    /// Remove every expired or corrupted entry under the cache namespace.
    ///
    /// Keys outside the namespace are never read or touched. Safe to call at
    /// any time; a second sweep with no intervening writes removes nothing.
    pub fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "Cache sweep could not enumerate keys");
                self.counters.store_failure();
                return report;
            }
        };

        let now = self.clock.now_millis();
        let prefix = self.config.key_prefix.as_str();
        for key in keys.iter().filter(|k| k.starts_with(prefix)) {
            report.scanned += 1;
            let raw = match self.store.get(key) {
                Ok(Some(raw)) => raw,
                // removed by someone else since the snapshot
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "Cache sweep read failed");
                    self.counters.store_failure();
                    continue;
                }
            };

            match entry::decode(&raw) {
                DecodedEntry::Valid(entry) if self.is_fresh(&entry, now) => report.retained += 1,
                DecodedEntry::Valid(_) | DecodedEntry::InvalidTimestamp => {
                    if self.evict(key) {
                        report.removed_expired += 1;
                    }
                }
                DecodedEntry::Corrupted => {
                    if self.evict(key) {
                        report.removed_corrupt += 1;
                    }
                }
            }
        }

        if report.removed() > 0 {
            tracing::info!(
                scanned = report.scanned,
                removed_expired = report.removed_expired,
                removed_corrupt = report.removed_corrupt,
                "Swept document cache"
            );
        }
        report
    }

    fn evict(&self, key: &str) -> bool {
        match self.store.delete(key) {
            Ok(removed) => {
                if removed {
                    tracing::debug!(key = %key, "Evicted cache entry");
                    self.counters.evicted(1);
                }
                removed
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache eviction failed");
                self.counters.store_failure();
                false
            }
        }
    }
}
