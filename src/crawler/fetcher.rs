//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The [`Fetcher`] seam the crawl engine is generic over
//! - Building HTTP clients with the configured user agent and timeouts
//! - Keeping redirects on the host of the original request
//! - Bounded retry for transient failures
//! - Error classification

use crate::config::HttpConfig;
use crate::FetchError;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A fetched response, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the body was served from, after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Response body
    pub body: String,
}

impl FetchedPage {
    /// A 200 text/html page served from `url`
    pub fn html(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            final_url: url.into(),
            status_code: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Network fetch capability used by crawl workers
///
/// Implementations own their retries and timeouts; a failure is reported per
/// URL and never stops the crawl.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(same_host_redirects())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Redirect policy that follows hops on the original host only
///
/// A hop to any other host is not followed; the 3xx response is handed back
/// to the fetcher, which reports it as [`FetchError::OffHostRedirect`].
fn same_host_redirects() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let leaves_host = attempt
            .previous()
            .first()
            .map_or(false, |origin| origin.host_str() != attempt.url().host_str());

        if leaves_host {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

/// reqwest-backed [`Fetcher`]
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 5xx | Retry up to `max-retries` times, fixed delay |
/// | Timeout | Retry up to `max-retries` times, fixed delay |
/// | Connection refused | Immediate failure |
/// | Redirect to another host | Immediate failure, target not fetched |
/// | Any other status | Returned as-is |
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(config)?,
            config.max_retries,
            Duration::from_millis(config.retry_delay_ms),
        ))
    }

    pub fn with_client(client: Client, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            max_retries,
            retry_delay,
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        if response.status().is_redirection() {
            // Only reached when the policy refused a hop to another host
            if let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                return Err(FetchError::OffHostRedirect {
                    url: url.to_string(),
                    location: location.to_string(),
                });
            }
        }

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage {
            final_url,
            status_code,
            content_type,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;

        loop {
            match self.fetch_once(url).await {
                Ok(page) if page.status_code >= 500 && attempt < self.max_retries => {
                    tracing::debug!(
                        "HTTP {} for {}, retrying ({}/{})",
                        page.status_code,
                        url,
                        attempt + 1,
                        self.max_retries
                    );
                }
                Err(FetchError::Timeout { .. }) if attempt < self.max_retries => {
                    tracing::debug!(
                        "Timeout for {}, retrying ({}/{})",
                        url,
                        attempt + 1,
                        self.max_retries
                    );
                }
                outcome => return outcome,
            }

            attempt += 1;
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
