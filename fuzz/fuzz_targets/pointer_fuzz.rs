//! Fuzz test for pointer parsing and resolution
//!
//! Splits the input into a pointer and a JSON document and checks that:
//! - Parsing and resolution never panic
//! - Re-encoding parsed segments yields a pointer with the same segments
//! - `locate` agrees with `resolve` on whether the location exists
//!
//! Run with: cargo +nightly fuzz run pointer_fuzz -- -max_total_time=60

#![no_main]

use feedscope_core::{locate, pointer, ValidationIssue};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let (path, document) = input.split_once('\n').unwrap_or((input, "null"));

    let segments = pointer::segments(path);
    assert_eq!(
        pointer::segments(&pointer::to_pointer(&segments)),
        segments,
        "encoding parsed segments must be stable"
    );

    if let Ok(root) = serde_json::from_str::<serde_json::Value>(document) {
        let resolved = pointer::resolve(&root, path);
        let issue = ValidationIssue::new("required key [x] not found", "required", path);
        assert_eq!(resolved.is_some(), locate(&root, &issue).is_some());
    }
});
