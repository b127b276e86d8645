//! HTTP fetcher implementation
//!
//! This module handles every outbound request made by the rediscovery engine:
//! - Building the HTTP client with the configured identity and timeouts
//! - GET requests with redirect following
//! - Error classification (timeout, connection, other)
//! - The politeness delay that follows every request

use crate::config::HttpConfig;
use reqwest::{header, redirect::Policy, Client};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// A fetched response, after redirects
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value (empty if absent)
    pub content_type: String,

    /// Response body decoded as text
    pub body: String,
}

impl FetchedPage {
    /// Returns true for statuses below 400
    pub fn is_ok_status(&self) -> bool {
        self.status < 400
    }
}

/// Transport-level fetch failure
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("too many redirects")]
    Redirect,

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_redirect() {
            FetchError::Redirect
        } else {
            FetchError::Other(e.to_string())
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use job_relink::config::HttpConfig;
/// use job_relink::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-US,en;q=0.9"),
    );

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(!config.verify_tls)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Polite, sequential page fetcher
///
/// Every call to [`Fetcher::get`] is followed by the configured politeness
/// delay, whether the request succeeded or not.
pub struct Fetcher {
    client: Client,
    delay: Duration,
    requests: AtomicU64,
}

impl Fetcher {
    /// Creates a fetcher from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(config)?,
            Duration::from_millis(config.politeness_delay_ms),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, delay: Duration) -> Self {
        Self {
            client,
            delay,
            requests: AtomicU64::new(0),
        }
    }

    /// Number of requests issued so far
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Fetches a URL, following redirects
    pub async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let result = self.fetch(url).await;

        match &result {
            Ok(page) => tracing::debug!(
                url,
                status = page.status,
                final_url = %page.final_url,
                "Fetched"
            ),
            Err(e) => tracing::debug!(url, error = %e, "Fetch failed"),
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        result
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // PDFs and other binaries decode lossily; only the text paths read the body
        let body = response.text().await?;

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            body,
        })
    }
}
