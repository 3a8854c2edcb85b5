//! On-store format of cached documents.
//!
//! An entry is a single JSON object with exactly two fields: `data`, the
//! cached document, and `ts`, the epoch-millisecond time it was stored.

use feedscope_core::{EpochMillis, JsonValue};
use serde::{Deserialize, Serialize};

/// A cached document and the time it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheEntry {
    pub data: JsonValue,
    pub ts: EpochMillis,
}

#[derive(Serialize)]
struct EntryRef<'a> {
    data: &'a JsonValue,
    ts: EpochMillis,
}

/// Outcome of reading stored text back as an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedEntry {
    /// Well-formed entry.
    Valid(CacheEntry),
    /// An entry object whose `ts` is missing or not a number.
    InvalidTimestamp,
    /// Text that is not an entry at all.
    Corrupted,
}

impl CacheEntry {
    pub fn new(data: JsonValue, ts: EpochMillis) -> Self {
        Self { data, ts }
    }

    /// Whether the entry is still inside `ttl_ms` at `now`.
    pub fn is_fresh(&self, now: EpochMillis, ttl_ms: i64) -> bool {
        now.saturating_sub(self.ts) <= ttl_ms
    }
}

/// Serialize `data` stored at `ts` without cloning the document.
pub fn encode(data: &JsonValue, ts: EpochMillis) -> serde_json::Result<String> {
    serde_json::to_string(&EntryRef { data, ts })
}

/// Classify stored text.
///
/// Text must parse as a JSON object holding `data` and nothing besides
/// `data` and `ts`; anything else is [`DecodedEntry::Corrupted`]. Numeric
/// timestamps that are not whole milliseconds are truncated.
pub fn decode(text: &str) -> DecodedEntry {
    let Ok(JsonValue::Object(mut fields)) = serde_json::from_str::<JsonValue>(text) else {
        return DecodedEntry::Corrupted;
    };
    if !fields.contains_key("data") || fields.keys().any(|k| k != "data" && k != "ts") {
        return DecodedEntry::Corrupted;
    }

    let ts = fields.get("ts").and_then(timestamp_of);
    let data = fields.remove("data").unwrap_or(JsonValue::Null);
    match ts {
        Some(ts) => DecodedEntry::Valid(CacheEntry { data, ts }),
        None => DecodedEntry::InvalidTimestamp,
    }
}

fn timestamp_of(value: &JsonValue) -> Option<EpochMillis> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        _ => None,
    }
}
