//! Error context resolution.
//!
//! Loads a feed document once per URL (through the expiring cache) and turns
//! each validation issue into an [`ErrorContext`].

use feedscope_core::{
    locate, ErrorSite, ExcerptConfig, FeedscopeResult, FetchError, JsonValue, ValidationIssue,
};
use feedscope_storage::{Clock, ExpiringDocumentCache, SystemClock, TextStore};

use crate::excerpt::{render_excerpt, Excerpt};
use crate::fetch::DocumentFetcher;

/// Everything the viewer needs to display one issue.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    pub issue: ValidationIssue,
    /// `None` when the issue's pointer does not resolve in the document.
    pub site: Option<ErrorSite>,
    pub excerpt: Excerpt,
}

impl ErrorContext {
    pub fn is_resolved(&self) -> bool {
        self.site.is_some()
    }
}

/// Build the context for `issue` against an already loaded document.
pub fn context_for(
    document: &JsonValue,
    issue: &ValidationIssue,
    config: &ExcerptConfig,
) -> ErrorContext {
    let site = locate(document, issue);
    let excerpt = render_excerpt(document, site.as_ref(), config);
    ErrorContext {
        issue: issue.clone(),
        site,
        excerpt,
    }
}

/// Loads feed documents and resolves validation issues against them.
///
/// # Type Parameters
///
/// - `S`: Text store behind the document cache
/// - `F`: Fetcher used on cache misses
/// - `C`: Clock for the cache
pub struct ErrorContextResolver<S, F, C = SystemClock>
where
    S: TextStore,
    F: DocumentFetcher,
    C: Clock,
{
    cache: ExpiringDocumentCache<S, C>,
    fetcher: F,
    excerpt: ExcerptConfig,
}

impl<S, F, C> ErrorContextResolver<S, F, C>
where
    S: TextStore,
    F: DocumentFetcher,
    C: Clock,
{
    pub fn new(cache: ExpiringDocumentCache<S, C>, fetcher: F, excerpt: ExcerptConfig) -> Self {
        Self {
            cache,
            fetcher,
            excerpt,
        }
    }

    pub fn cache(&self) -> &ExpiringDocumentCache<S, C> {
        &self.cache
    }

    pub fn excerpt_config(&self) -> &ExcerptConfig {
        &self.excerpt
    }

    /// Return the document for `url`, fetching and caching it on a miss.
    ///
    /// Cache failures never surface here; only fetch and parse failures do.
    pub async fn load_document(&self, url: &str) -> FeedscopeResult<JsonValue> {
        if let Some(document) = self.cache.get(url) {
            tracing::debug!(url, "Document served from cache");
            return Ok(document);
        }

        tracing::debug!(url, "Document cache miss, fetching");
        let text = self.fetcher.fetch_text(url).await?;
        let document: JsonValue =
            serde_json::from_str(&text).map_err(|e| FetchError::InvalidJson {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        self.cache.set(url, &document);
        Ok(document)
    }

    /// Resolve a single issue against the document at `url`.
    pub async fn resolve_issue(
        &self,
        url: &str,
        issue: &ValidationIssue,
    ) -> FeedscopeResult<ErrorContext> {
        let document = self.load_document(url).await?;
        Ok(context_for(&document, issue, &self.excerpt))
    }

    /// Resolve every issue of a report, loading the document once.
    pub async fn resolve_report(
        &self,
        url: &str,
        issues: &[ValidationIssue],
    ) -> FeedscopeResult<Vec<ErrorContext>> {
        let document = self.load_document(url).await?;
        let contexts: Vec<ErrorContext> = issues
            .iter()
            .map(|issue| context_for(&document, issue, &self.excerpt))
            .collect();

        let unresolved = contexts.iter().filter(|c| !c.is_resolved()).count();
        tracing::info!(
            url,
            issues = contexts.len(),
            unresolved,
            "Resolved validation report"
        );
        Ok(contexts)
    }
}
