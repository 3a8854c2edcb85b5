//! Expiring document cache over a text store.
//!
//! Fetched feed documents are stored as `{"data": ..., "ts": ...}` text under
//! `prefix + url`. Entries expire a fixed time after they were stored.
//!
//! # Failure Model
//!
//! The cache is advisory. Every store failure is absorbed and reported as a
//! miss, so a broken or full store only costs a re-fetch.
//!
//! # Eviction
//!
//! - `get` evicts expired entries and entries with an unusable timestamp.
//! - `get` leaves text that is not an entry at all in place; reclaiming it
//!   would add a write to every lookup of a broken key.
//! - `sweep` removes both kinds in one pass over the namespace.
//!
//! # Example
//!
//! ```ignore
//! let cache = ExpiringDocumentCache::new(InMemoryTextStore::new(), CacheConfig::default());
//! cache.set("https://example.com/gbfs.json", &document);
//! let hit = cache.get("https://example.com/gbfs.json");
//! let report = cache.sweep();
//! ```

pub mod clock;
pub mod document_cache;
pub mod entry;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use document_cache::ExpiringDocumentCache;
pub use entry::{CacheEntry, DecodedEntry};
pub use stats::{CacheStats, SweepReport};
