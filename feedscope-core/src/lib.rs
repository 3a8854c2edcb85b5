//! Feedscope Core - Pointer Resolution and Shared Types
//!
//! Pure building blocks for locating validation errors inside GBFS feed
//! documents. Nothing in this crate performs I/O; the storage and fetch
//! layers live in `feedscope-storage` and `feedscope-context`.

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod pointer;

pub use config::{CacheConfig, ExcerptConfig, FetchConfig};
pub use diagnostic::{classify_missing_key, locate, ErrorSite, IssueKind, ValidationIssue};
pub use error::{ConfigError, FeedscopeError, FeedscopeResult, FetchError, StoreError};
pub use pointer::{escape_segment, parent, resolve, resolve_segments, segments, to_pointer};

/// JSON-like document value.
///
/// A closed sum type (null, bool, number, string, array, object). Feed
/// documents, cached payloads and resolved error sites all use it.
pub type JsonValue = serde_json::Value;

/// Milliseconds since the Unix epoch, as stored in cache entries.
pub type EpochMillis = i64;
