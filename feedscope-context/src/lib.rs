//! Feedscope Context - Error Context Assembly
//!
//! Ties the pieces together for the validation-report viewer: load the feed
//! document (from the cache, or fetch and cache it), locate each validation
//! issue inside it, and render a bounded, highlighted excerpt around it.

pub mod excerpt;
pub mod fetch;
pub mod resolver;

pub use excerpt::{render_excerpt, Excerpt, ExcerptLine};
pub use fetch::{DocumentFetcher, HttpFetcher};
pub use resolver::{context_for, ErrorContext, ErrorContextResolver};
