//! Expiring document cache over stores that fail part way.
//!
//! Every failure is absorbed: lookups degrade to misses, sweeps report only
//! what they actually removed, and each failed store call is counted once.

use std::sync::Arc;
use std::time::Duration;

use feedscope_core::CacheConfig;
use feedscope_storage::{
    ExpiringDocumentCache, InMemoryTextStore, ManualClock, SweepReport, TextStore,
};
use feedscope_test_utils::fixtures::{
    corrupted_entries, vehicle_types, NOW_MS, STATION_INFORMATION_URL, VEHICLE_TYPES_URL,
};
use feedscope_test_utils::{FailingTextStore, FaultyTextStore};
use serde_json::json;

const PAST_TTL: Duration = Duration::from_millis(700_000);

fn create_cache<S: TextStore>(
    store: S,
) -> (ExpiringDocumentCache<S, Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(NOW_MS));
    let cache = ExpiringDocumentCache::with_clock(store, clock.clone(), CacheConfig::default());
    (cache, clock)
}

fn key(url: &str) -> String {
    CacheConfig::default().key_for(url)
}

#[test]
fn test_sweep_on_unavailable_store_reports_nothing() {
    let (cache, _clock) = create_cache(FailingTextStore::unavailable());

    assert_eq!(cache.sweep(), SweepReport::default());
    let stats = cache.stats();
    assert_eq!(stats.store_failures, 1);
    assert_eq!(stats.evictions, 0);
}

#[test]
fn test_get_on_unavailable_store_is_a_miss() {
    let (cache, _clock) = create_cache(FailingTextStore::unavailable());

    assert_eq!(cache.get(STATION_INFORMATION_URL), None);
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.store_failures, 1);
}

#[test]
fn test_expired_get_survives_failed_delete() {
    let store = FaultyTextStore::new(InMemoryTextStore::new()).failing_deletes();
    let (cache, clock) = create_cache(store);

    cache.set(STATION_INFORMATION_URL, &json!({ "ttl": 60 }));
    clock.advance(PAST_TTL);

    assert_eq!(cache.get(STATION_INFORMATION_URL), None);
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.store_failures, 1);
    assert!(cache
        .store()
        .inner()
        .get(&key(STATION_INFORMATION_URL))
        .expect("inner store readable")
        .is_some());
}

#[test]
fn test_sweep_with_failed_deletes_removes_nothing() {
    let store = FaultyTextStore::new(InMemoryTextStore::new()).failing_deletes();
    let (cache, clock) = create_cache(store);

    cache.set(VEHICLE_TYPES_URL, &vehicle_types());
    clock.advance(PAST_TTL);
    cache
        .store()
        .set(&key(STATION_INFORMATION_URL), "<html>")
        .expect("seed should succeed");

    let report = cache.sweep();
    assert_eq!(
        report,
        SweepReport {
            scanned: 2,
            retained: 0,
            removed_expired: 0,
            removed_corrupt: 0,
        }
    );
    assert_eq!(cache.stats().store_failures, 2);
    assert_eq!(cache.stats().evictions, 0);
    assert_eq!(cache.store().inner().count().expect("inner store readable"), 2);
}

#[test]
fn test_sweep_skips_unreadable_entries() {
    let store = FaultyTextStore::new(InMemoryTextStore::new()).failing_gets();
    let (cache, _clock) = create_cache(store);

    cache.set("https://a/one.json", &json!(1));
    cache.set("https://a/two.json", &json!(2));
    cache
        .store()
        .set("unrelated:setting", "kept")
        .expect("seed should succeed");

    let report = cache.sweep();
    assert_eq!(
        report,
        SweepReport {
            scanned: 2,
            retained: 0,
            removed_expired: 0,
            removed_corrupt: 0,
        }
    );
    assert_eq!(cache.stats().store_failures, 2);
    assert_eq!(cache.store().inner().count().expect("inner store readable"), 3);
}

#[test]
fn test_corrupted_shapes_wait_for_sweep() {
    for text in corrupted_entries() {
        let (cache, _clock) = create_cache(InMemoryTextStore::new());
        let stored = key(STATION_INFORMATION_URL);
        cache.store().set(&stored, text).expect("seed should succeed");

        assert_eq!(cache.get(STATION_INFORMATION_URL), None, "entry {:?}", text);
        assert_eq!(
            cache.store().get(&stored).expect("store readable"),
            Some(text.to_string()),
            "lookup removed entry {:?}",
            text
        );

        let report = cache.sweep();
        assert_eq!(report.removed_corrupt, 1, "entry {:?}", text);
        assert_eq!(report.removed_expired, 0, "entry {:?}", text);
        assert_eq!(cache.store().get(&stored).expect("store readable"), None);
    }
}
