//! Feedscope Storage - Text Stores and the Expiring Document Cache
//!
//! The cache keeps fetched feed documents in a key-value text store so the
//! validation viewer does not re-download large files for every issue it
//! shows. The store is injected, so the same cache runs over an in-memory
//! map, an LMDB file, or a test double.

pub mod cache;
pub mod store;

pub use cache::{
    CacheEntry, CacheStats, Clock, DecodedEntry, ExpiringDocumentCache, ManualClock, SweepReport,
    SystemClock,
};
pub use store::{InMemoryTextStore, LmdbTextStore, StoreResult, TextStore, MAX_MAP_SIZE_MB};
