//! Feedscope Test Utilities
//!
//! Centralized test infrastructure for the feedscope workspace:
//! - Store doubles (failing, faulty, counting) for exercising cache failure handling
//! - Proptest generators for documents, pointers and issues
//! - GBFS feed fixtures
//! - Custom assertions for feedscope results

// Re-export core types for convenience
pub use feedscope_core::{
    CacheConfig, ConfigError, ErrorSite, ExcerptConfig, FeedscopeError, FeedscopeResult,
    FetchError, IssueKind, JsonValue, StoreError, ValidationIssue,
};
pub use feedscope_storage::{InMemoryTextStore, StoreResult, TextStore};

use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// STORE DOUBLES
// ============================================================================

/// A store on which every operation fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingTextStore {
    error: StoreError,
}

impl FailingTextStore {
    pub fn new(error: StoreError) -> Self {
        Self { error }
    }

    /// Storage is switched off entirely (private browsing, disabled profile).
    pub fn unavailable() -> Self {
        Self::new(StoreError::Unavailable {
            reason: "storage disabled".to_string(),
        })
    }
}

impl TextStore for FailingTextStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(self.error.clone())
    }

    fn set(&self, _key: &str, _text: &str) -> StoreResult<()> {
        Err(self.error.clone())
    }

    fn delete(&self, _key: &str) -> StoreResult<bool> {
        Err(self.error.clone())
    }

    fn key_at(&self, _index: usize) -> StoreResult<Option<String>> {
        Err(self.error.clone())
    }

    fn count(&self) -> StoreResult<usize> {
        Err(self.error.clone())
    }
}

/// Wraps a store and fails selected operations while delegating the rest.
#[derive(Debug, Default)]
pub struct FaultyTextStore<S = InMemoryTextStore> {
    inner: S,
    fail_gets: bool,
    fail_deletes: bool,
}

impl<S: TextStore> FaultyTextStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_gets: false,
            fail_deletes: false,
        }
    }

    /// Every `get` fails; key enumeration still works.
    pub fn failing_gets(mut self) -> Self {
        self.fail_gets = true;
        self
    }

    /// Every `delete` fails.
    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn fault(operation: &str) -> StoreError {
        StoreError::Backend {
            reason: format!("injected {} failure", operation),
        }
    }
}

impl<S: TextStore> TextStore for FaultyTextStore<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_gets {
            return Err(Self::fault("get"));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, text: &str) -> StoreResult<()> {
        self.inner.set(key, text)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        if self.fail_deletes {
            return Err(Self::fault("delete"));
        }
        self.inner.delete(key)
    }

    fn key_at(&self, index: usize) -> StoreResult<Option<String>> {
        self.inner.key_at(index)
    }

    fn count(&self) -> StoreResult<usize> {
        self.inner.count()
    }
}

/// Wraps a store and counts calls per operation.
#[derive(Debug, Default)]
pub struct CountingTextStore<S = InMemoryTextStore> {
    inner: S,
    gets: AtomicUsize,
    sets: AtomicUsize,
    deletes: AtomicUsize,
}

impl<S: TextStore> CountingTextStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::Relaxed)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::Relaxed)
    }
}

impl<S: TextStore> TextStore for CountingTextStore<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.inner.get(key)
    }

    fn set(&self, key: &str, text: &str) -> StoreResult<()> {
        self.sets.fetch_add(1, Ordering::Relaxed);
        self.inner.set(key, text)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.inner.delete(key)
    }

    fn key_at(&self, index: usize) -> StoreResult<Option<String>> {
        self.inner.key_at(index)
    }

    fn count(&self) -> StoreResult<usize> {
        self.inner.count()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for feedscope inputs.

    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map};

    /// Object keys, including the characters pointers must escape.
    pub fn arb_object_key() -> impl Strategy<Value = String> {
        prop_oneof![
            3 => "[a-z_]{1,10}",
            1 => "[a-z~/]{1,6}",
        ]
    }

    pub fn arb_json_leaf() -> impl Strategy<Value = JsonValue> {
        prop_oneof![
            Just(JsonValue::Null),
            any::<bool>().prop_map(JsonValue::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            (-1.0e6f64..1.0e6).prop_map(|n| json!(n)),
            "[a-zA-Z0-9 .:-]{0,16}".prop_map(JsonValue::String),
        ]
    }

    /// Arbitrary documents, a few levels deep.
    pub fn arb_json_value() -> impl Strategy<Value = JsonValue> {
        arb_json_leaf().prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(JsonValue::Array),
                prop::collection::btree_map(arb_object_key(), inner, 0..6).prop_map(|entries| {
                    JsonValue::Object(entries.into_iter().collect::<Map<String, JsonValue>>())
                }),
            ]
        })
    }

    /// A document paired with the segments of one location that exists in it
    /// (possibly the root).
    pub fn arb_document_with_path() -> impl Strategy<Value = (JsonValue, Vec<String>)> {
        arb_json_value().prop_flat_map(|doc| {
            let paths = all_paths(&doc);
            (Just(doc), prop::sample::select(paths))
        })
    }

    /// Validator keywords, weighted toward the ones with special handling.
    pub fn arb_keyword() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("required".to_string()),
            Just("enum".to_string()),
            Just("type".to_string()),
            Just("minimum".to_string()),
            "[a-zA-Z]{1,12}",
        ]
    }

    pub fn arb_validation_issue() -> impl Strategy<Value = ValidationIssue> {
        (
            "[ -~]{0,40}",
            arb_keyword(),
            prop::collection::vec(arb_object_key(), 0..5),
        )
            .prop_map(|(message, keyword, path)| {
                ValidationIssue::new(message, keyword, feedscope_core::to_pointer(&path))
            })
    }

    pub fn arb_valid_cache_config() -> impl Strategy<Value = CacheConfig> {
        (1u64..86_400_000, "[a-z]{1,8}:").prop_map(|(ttl_ms, key_prefix)| CacheConfig {
            ttl_ms,
            key_prefix,
        })
    }

    /// Every location in `doc`, root first.
    pub fn all_paths(doc: &JsonValue) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        collect_paths(doc, &mut Vec::new(), &mut paths);
        paths
    }

    fn collect_paths(value: &JsonValue, current: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        out.push(current.clone());
        match value {
            JsonValue::Object(map) => {
                for (key, child) in map {
                    current.push(key.clone());
                    collect_paths(child, current, out);
                    current.pop();
                }
            }
            JsonValue::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    current.push(index.to_string());
                    collect_paths(child, current, out);
                    current.pop();
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! GBFS documents and validator output for tests.

    use super::*;
    use serde_json::json;

    pub const STATION_INFORMATION_URL: &str =
        "https://gbfs.example.com/v2.3/en/station_information.json";
    pub const VEHICLE_TYPES_URL: &str = "https://gbfs.example.com/v2.3/en/vehicle_types.json";

    /// Epoch milliseconds used as "now" across fixtures.
    pub const NOW_MS: i64 = 1_700_000_000_000;

    /// A station_information feed where the second station lacks `lat`.
    pub fn station_information() -> JsonValue {
        json!({
            "last_updated": 1_700_000_000,
            "ttl": 60,
            "version": "2.3",
            "data": {
                "stations": [
                    {
                        "station_id": "st-001",
                        "name": "Harbour Front",
                        "lat": 45.5017,
                        "lon": -73.5673,
                        "capacity": 20
                    },
                    {
                        "station_id": "st-002",
                        "name": "Old Port / Quay",
                        "lon": -73.5541,
                        "capacity": -4
                    }
                ]
            }
        })
    }

    /// A vehicle_types feed with an out-of-range `form_factor`.
    pub fn vehicle_types() -> JsonValue {
        json!({
            "last_updated": 1_700_000_000,
            "ttl": 0,
            "version": "2.3",
            "data": {
                "vehicle_types": [
                    { "vehicle_type_id": "bike", "form_factor": "bicycle", "propulsion_type": "human" },
                    { "vehicle_type_id": "hover", "form_factor": "hoverboard", "propulsion_type": "electric" }
                ]
            }
        })
    }

    /// Validator output for [`station_information`], one issue per site kind
    /// plus one pointer that does not resolve.
    pub fn station_information_issues() -> Vec<ValidationIssue> {
        vec![
            ValidationIssue::new(
                "#/data/stations/1: required key [lat] not found",
                "required",
                "#/data/stations/1",
            )
            .with_schema_path("#/properties/data/properties/stations/items/required"),
            ValidationIssue::new(
                "#/data/stations/1/capacity: -4 is not greater or equal to 0",
                "minimum",
                "#/data/stations/1/capacity",
            ),
            ValidationIssue::new(
                "#/data/stations/0: expected type: String, found: JSONObject",
                "type",
                "#/data/stations/0",
            ),
            ValidationIssue::new(
                "#/data/stations/9: station not found",
                "type",
                "#/data/stations/9",
            ),
        ]
    }

    pub fn vehicle_types_issues() -> Vec<ValidationIssue> {
        vec![ValidationIssue::new(
            "#/data/vehicle_types/1/form_factor: hoverboard is not a valid enum value",
            "enum",
            "#/data/vehicle_types/1/form_factor",
        )]
    }

    /// Text that decodes as neither a valid entry nor an entry with a bad
    /// timestamp.
    pub fn corrupted_entries() -> Vec<&'static str> {
        vec![
            "<html>",
            "",
            "null",
            "[1,2,3]",
            r#"{"ts": 1700000000000}"#,
            r#"{"data": 1, "ts": 1700000000000, "extra": true}"#,
        ]
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for feedscope results.

    use super::*;

    /// Assert that a result is a Fetch error.
    #[track_caller]
    pub fn assert_fetch_error<T: std::fmt::Debug>(result: &FeedscopeResult<T>) {
        match result {
            Err(FeedscopeError::Fetch(_)) => {}
            other => panic!("Expected Fetch error, got: {:?}", other),
        }
    }

    /// Assert that a result is an InvalidJson fetch error.
    #[track_caller]
    pub fn assert_invalid_json<T: std::fmt::Debug>(result: &FeedscopeResult<T>) {
        match result {
            Err(FeedscopeError::Fetch(FetchError::InvalidJson { .. })) => {}
            other => panic!("Expected InvalidJson error, got: {:?}", other),
        }
    }

    /// Assert that the site kind matches.
    #[track_caller]
    pub fn assert_site_kind(site: Option<&ErrorSite>, expected: &str) {
        let actual = match site {
            Some(ErrorSite::MissingRequiredKey { .. }) => "missing_required_key",
            Some(ErrorSite::EnumViolation { .. }) => "enum_violation",
            Some(ErrorSite::ArrayElement { .. }) => "array_element",
            Some(ErrorSite::Leaf { .. }) => "leaf",
            None => "unresolved",
        };
        assert_eq!(actual, expected, "Unexpected error site: {:?}", site);
    }

    #[track_caller]
    pub fn assert_cache_config_valid(config: &CacheConfig) {
        if let Err(e) = config.validate() {
            panic!("Cache config validation failed: {:?}", e);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_failing_store_fails_every_operation() {
        let store = FailingTextStore::unavailable();
        assert!(store.get("k").is_err());
        assert!(store.set("k", "v").is_err());
        assert!(store.delete("k").is_err());
        assert!(store.keys().is_err());
    }

    #[test]
    fn test_faulty_store_fails_only_selected_operations() {
        let store = FaultyTextStore::new(InMemoryTextStore::new()).failing_deletes();
        store.set("k", "v").expect("set should succeed");
        assert_eq!(store.get("k").expect("get should succeed"), Some("v".to_string()));
        assert!(store.delete("k").is_err());
        assert_eq!(store.keys().expect("keys should succeed"), vec!["k"]);

        let unreadable = FaultyTextStore::new(InMemoryTextStore::new()).failing_gets();
        unreadable.set("k", "v").expect("set should succeed");
        assert!(unreadable.get("k").is_err());
        assert!(unreadable.delete("k").expect("delete should succeed"));
    }

    #[test]
    fn test_counting_store_counts() {
        let store = CountingTextStore::new(InMemoryTextStore::new());
        store.set("a", "1").expect("set should succeed");
        store.get("a").expect("get should succeed");
        store.get("b").expect("get should succeed");
        store.delete("a").expect("delete should succeed");
        assert_eq!((store.sets(), store.gets(), store.deletes()), (1, 2, 1));
        assert_eq!(store.inner().count().expect("count should succeed"), 0);
    }

    #[test]
    fn test_fixture_issues_cover_every_site_kind() {
        let doc = fixtures::station_information();
        let sites: Vec<_> = fixtures::station_information_issues()
            .iter()
            .map(|issue| feedscope_core::locate(&doc, issue))
            .collect();
        assertions::assert_site_kind(sites[0].as_ref(), "missing_required_key");
        assertions::assert_site_kind(sites[1].as_ref(), "leaf");
        assertions::assert_site_kind(sites[2].as_ref(), "array_element");
        assertions::assert_site_kind(sites[3].as_ref(), "unresolved");

        let vehicles = fixtures::vehicle_types();
        let site = feedscope_core::locate(&vehicles, &fixtures::vehicle_types_issues()[0]);
        assertions::assert_site_kind(site.as_ref(), "enum_violation");
    }

    #[test]
    fn test_all_paths_includes_root_and_leaves() {
        let doc = serde_json::json!({ "a": [1, { "b": null }] });
        let paths = generators::all_paths(&doc);
        assert_eq!(paths.first(), Some(&Vec::<String>::new()));
        assert!(paths.contains(&vec!["a".to_string(), "1".to_string(), "b".to_string()]));
        assert_eq!(paths.len(), 5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_paths_resolve((doc, path) in generators::arb_document_with_path()) {
            prop_assert!(feedscope_core::resolve_segments(&doc, &path).is_some());
        }

        #[test]
        fn prop_generated_cache_config_is_valid(config in generators::arb_valid_cache_config()) {
            assertions::assert_cache_config_valid(&config);
        }
    }
}
