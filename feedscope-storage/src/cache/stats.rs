//! Cache counters and sweep results.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that returned a document.
    pub hits: u64,
    /// Lookups that returned nothing, for any reason.
    pub misses: u64,
    /// Successful writes.
    pub writes: u64,
    /// Entries removed by lookups, sweeps or explicit invalidation.
    pub evictions: u64,
    /// Store operations that failed and were absorbed.
    pub store_failures: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Live counters behind [`CacheStats`].
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    evictions: AtomicU64,
    store_failures: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn evicted(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }
}

/// Result of one sweep over the cache namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Namespaced keys examined.
    pub scanned: usize,
    /// Valid, unexpired entries left in place.
    pub retained: usize,
    /// Entries removed for age or an unusable timestamp.
    pub removed_expired: usize,
    /// Entries removed because their text was not an entry.
    pub removed_corrupt: usize,
}

impl SweepReport {
    pub fn removed(&self) -> usize {
        self.removed_expired + self.removed_corrupt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.8).abs() < 0.001);

        let empty_stats = CacheStats::default();
        assert!((empty_stats.hit_rate() - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_counters_snapshot() {
        let counters = CacheCounters::default();
        counters.hit();
        counters.miss();
        counters.miss();
        counters.evicted(3);
        let stats = counters.snapshot();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.evictions, 3);
        assert_eq!(stats.writes, 0);
    }

    #[test]
    fn test_sweep_report_removed() {
        let report = SweepReport {
            scanned: 5,
            retained: 2,
            removed_expired: 2,
            removed_corrupt: 1,
        };
        assert_eq!(report.removed(), 3);
    }
}
