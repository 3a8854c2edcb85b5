//! Fuzz test for cache entry decoding
//!
//! Arbitrary store text must classify without panicking, and every valid
//! entry must survive a re-encode unchanged.
//!
//! Run with: cargo +nightly fuzz run entry_decode_fuzz -- -max_total_time=60

#![no_main]

use feedscope_storage::cache::entry::{decode, encode};
use feedscope_storage::DecodedEntry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let DecodedEntry::Valid(entry) = decode(text) {
        let Ok(encoded) = encode(&entry.data, entry.ts) else {
            return;
        };
        match decode(&encoded) {
            DecodedEntry::Valid(again) => assert_eq!(again, entry),
            other => panic!("re-encoded entry decoded as {:?}", other),
        }
    }
});
