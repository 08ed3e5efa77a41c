//! Browser-like HTTP client shared by the CSV fetch and image downloads.
//!
//! The client keeps a persistent public-suffix-aware cookie jar across
//! redirects and sends browser-like request headers, which several image CDNs
//! require before serving assets.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client, ClientBuilder, Response};
use tracing::debug;

use crate::errors::{BatchError, BatchResult};
use crate::infrastructure::config::HttpConfig;

/// HTTP client with browser-like defaults.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client from the HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).context("Invalid accept header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .context("Invalid accept-language header")?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer).context("Invalid referer header")?,
        );

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET a URL, treating any non-2xx status as a hard error carrying the
    /// status text.
    pub async fn get(&self, url: &str) -> BatchResult<Response> {
        debug!("HTTP GET: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BatchError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BatchError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// GET a URL and return the response body as text.
    pub async fn get_text(&self, url: &str) -> BatchResult<String> {
        let response = self.get(url).await?;
        let text = response
            .text()
            .await
            .map_err(|e| BatchError::request(url, e))?;

        debug!("Fetched {} bytes from {url}", text.len());
        Ok(text)
    }
}
