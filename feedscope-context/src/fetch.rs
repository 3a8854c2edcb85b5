//! Document fetch boundary.

use std::sync::Arc;

use async_trait::async_trait;
use feedscope_core::{ConfigError, FeedscopeResult, FetchConfig, FetchError};

/// Retrieves the raw text of a feed document.
///
/// Implementations must not parse or cache; the resolver does both.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> FeedscopeResult<String>;
}

#[async_trait]
impl<T: DocumentFetcher + ?Sized> DocumentFetcher for Arc<T> {
    async fn fetch_text(&self, url: &str) -> FeedscopeResult<String> {
        (**self).fetch_text(url).await
    }
}

/// HTTP fetcher backed by reqwest.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> FeedscopeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "fetch".to_string(),
                value: config.user_agent.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> FeedscopeResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let text = response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(url, bytes = text.len(), "Fetched document");
        Ok(text)
    }
}
