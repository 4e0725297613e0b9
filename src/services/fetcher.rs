//! Page fetching.
//!
//! A [`PageFetcher`] turns a product URL into the page's HTML. The watcher
//! only cares about the final HTML or the fact that loading failed.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;
use crate::utils::{get_domain, http};

/// Source of product page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Load `url` and return the document's HTML.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with a desktop browser user agent.
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    /// Create a fetcher using the configured user agent and timeout.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_error(&self, url: &str, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::timeout(url, self.timeout_secs)
        } else {
            AppError::Http(error)
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;

        // Error pages are still classified; they just never show a live cart button.
        let status = response.status();
        if !status.is_success() {
            log::debug!(
                "{} answered {} for {}",
                get_domain(url).unwrap_or_else(|| url.to_string()),
                status,
                url
            );
        }

        response.text().await.map_err(|e| self.map_error(url, e))
    }
}
